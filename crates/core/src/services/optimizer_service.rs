use std::collections::BTreeMap;

use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use chrono::NaiveDate;
use log::debug;

use crate::errors::CoreError;
use crate::models::analytics::{InstrumentWeight, OptimizationResult};
use crate::models::price::PricePoint;
use crate::models::returns::ReturnSeries;

/// Conventional equity trading days per year, used to annualize daily
/// statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

const MAX_SOLVER_ITERATIONS: u64 = 5_000;
const SOLVER_SD_TOLERANCE: f64 = 1e-8;

/// Weight on the squared target-return miss in the objective. Large
/// enough that the solver treats the target as an equality constraint
/// rather than a soft preference.
const TARGET_RETURN_PENALTY: f64 = 1_000.0;

/// How far the achieved annual return may sit from the requested target
/// before the solve is reported as failed (absolute, or 1% of the target
/// if that is larger).
const TARGET_RETURN_TOLERANCE: f64 = 5e-3;

/// Finds nonnegative weights summing to 1 that minimize annualized
/// portfolio standard deviation, optionally subject to hitting a target
/// annual return.
///
/// The weight constraints are enforced structurally: the solver searches
/// an unconstrained vector `x` and the weights are `softmax(x)`, which
/// lies on the unit simplex by construction. The target-return equality
/// is a quadratic penalty; after the solve the achieved return is
/// checked against the target and a miss is reported as
/// `OptimizationFailed` — infeasible targets (above the best single
/// instrument, or below the minimum-variance return) are the expected
/// failure mode and are not pre-validated.
pub struct OptimizerService;

impl OptimizerService {
    pub fn new() -> Self {
        Self
    }

    /// Build aligned daily return series from per-instrument price
    /// histories.
    ///
    /// Only dates where *every* instrument has a close are used; returns
    /// are fractional changes over consecutive common dates. Instruments
    /// with fewer than two prices contribute nothing and should have
    /// been dropped by the caller beforehand.
    pub fn build_return_series(
        &self,
        histories: &[(String, Vec<PricePoint>)],
    ) -> Result<Vec<ReturnSeries>, CoreError> {
        if histories.len() < 2 {
            return Err(CoreError::InsufficientData(format!(
                "need at least 2 instruments with price history, got {}",
                histories.len()
            )));
        }

        // Per-instrument date → price maps, then the sorted intersection
        // of all date sets.
        let price_maps: Vec<BTreeMap<NaiveDate, f64>> = histories
            .iter()
            .map(|(_, points)| points.iter().map(|p| (p.date, p.price)).collect())
            .collect();

        let mut common_dates: Vec<NaiveDate> = price_maps[0].keys().copied().collect();
        for map in &price_maps[1..] {
            common_dates.retain(|d| map.contains_key(d));
        }

        if common_dates.len() < 2 {
            return Err(CoreError::InsufficientData(format!(
                "only {} overlapping observation dates across instruments, need at least 2",
                common_dates.len()
            )));
        }

        let series = histories
            .iter()
            .zip(&price_maps)
            .map(|((symbol, _), map)| {
                let returns = common_dates
                    .windows(2)
                    .map(|pair| {
                        let prev = map[&pair[0]];
                        let next = map[&pair[1]];
                        if prev > 0.0 {
                            (next - prev) / prev
                        } else {
                            0.0
                        }
                    })
                    .collect();
                ReturnSeries::new(symbol.clone(), returns)
            })
            .collect();

        Ok(series)
    }

    /// Solve for optimal weights over aligned return series.
    ///
    /// `target_return` is an *annualized* fractional return (e.g. 0.08
    /// for 8%); `None` solves for the global minimum-variance portfolio.
    pub fn solve(
        &self,
        series: &[ReturnSeries],
        target_return: Option<f64>,
    ) -> Result<OptimizationResult, CoreError> {
        let n = series.len();
        if n < 2 {
            return Err(CoreError::InsufficientData(format!(
                "need at least 2 instruments to optimize, got {n}"
            )));
        }
        let rows = series[0].returns.len();
        if rows < 1 || series.iter().any(|s| s.returns.len() != rows) {
            return Err(CoreError::InsufficientData(
                "return series must be non-empty and equally long".into(),
            ));
        }

        // Annualized moments from daily observations.
        let mu = annual_means(series);
        let sigma = annual_covariance(series);

        let cost = MeanVarianceCost {
            mu: mu.clone(),
            sigma: sigma.clone(),
            target_return,
        };

        // Initial simplex around the zero vector: softmax(0) is the
        // equal-weight portfolio.
        let x0 = vec![0.0_f64; n];
        let mut simplex = Vec::with_capacity(n + 1);
        simplex.push(x0.clone());
        for i in 0..n {
            let mut point = x0.clone();
            point[i] = 1.0;
            simplex.push(point);
        }

        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(SOLVER_SD_TOLERANCE)
            .map_err(|_| CoreError::OptimizationFailed {
                target: target_return,
            })?;

        let solved = Executor::new(cost, solver)
            .configure(|state| state.max_iters(MAX_SOLVER_ITERATIONS))
            .run()
            .map_err(|_| CoreError::OptimizationFailed {
                target: target_return,
            })?;

        let best_x = solved
            .state
            .best_param
            .ok_or(CoreError::OptimizationFailed {
                target: target_return,
            })?;
        let weights = softmax(&best_x);

        if weights.iter().any(|w| !w.is_finite()) {
            return Err(CoreError::OptimizationFailed {
                target: target_return,
            });
        }

        let expected_return = dot(&weights, &mu);
        let risk = portfolio_std(&weights, &sigma);
        debug!(
            "mean-variance solve: n={n}, rows={rows}, return={expected_return:.4}, risk={risk:.4}"
        );

        // The penalty only approximates the equality constraint; reject
        // solves that missed the target, which is what an infeasible
        // target produces.
        if let Some(target) = target_return {
            let tolerance = TARGET_RETURN_TOLERANCE.max(target.abs() * 0.01);
            if (expected_return - target).abs() > tolerance {
                return Err(CoreError::OptimizationFailed {
                    target: target_return,
                });
            }
        }

        Ok(OptimizationResult {
            weights: series
                .iter()
                .zip(&weights)
                .map(|(s, &w)| InstrumentWeight {
                    symbol: s.symbol.clone(),
                    weight: w,
                })
                .collect(),
            expected_return,
            risk,
            skipped_symbols: Vec::new(),
        })
    }
}

impl Default for OptimizerService {
    fn default() -> Self {
        Self::new()
    }
}

// ── Objective ───────────────────────────────────────────────────────

struct MeanVarianceCost {
    mu: Vec<f64>,
    sigma: Vec<Vec<f64>>,
    target_return: Option<f64>,
}

impl CostFunction for MeanVarianceCost {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let w = softmax(x);
        let risk = portfolio_std(&w, &self.sigma);
        let penalty = match self.target_return {
            Some(target) => {
                let miss = dot(&w, &self.mu) - target;
                TARGET_RETURN_PENALTY * miss * miss
            }
            None => 0.0,
        };
        Ok(risk + penalty)
    }
}

// ── Statistics helpers ──────────────────────────────────────────────

/// Mean daily return per instrument, annualized.
fn annual_means(series: &[ReturnSeries]) -> Vec<f64> {
    series
        .iter()
        .map(|s| sample_mean(&s.returns) * TRADING_DAYS_PER_YEAR)
        .collect()
}

/// Sample covariance matrix of daily returns, annualized.
///
/// With a single observation the divisor is clamped to 1, degenerating
/// to a zero matrix instead of dividing by zero.
fn annual_covariance(series: &[ReturnSeries]) -> Vec<Vec<f64>> {
    let n = series.len();
    let rows = series[0].returns.len();
    let means: Vec<f64> = series.iter().map(|s| sample_mean(&s.returns)).collect();
    let divisor = ((rows as f64) - 1.0).max(1.0);

    let mut sigma = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let mut acc = 0.0;
            for t in 0..rows {
                acc += (series[i].returns[t] - means[i]) * (series[j].returns[t] - means[j]);
            }
            let cov = acc / divisor * TRADING_DAYS_PER_YEAR;
            sigma[i][j] = cov;
            sigma[j][i] = cov;
        }
    }
    sigma
}

fn sample_mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn mat_vec_mul(mat: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    mat.iter().map(|row| dot(row, v)).collect()
}

/// Annualized portfolio standard deviation: `sqrt(wᵀ Σ w)`.
fn portfolio_std(w: &[f64], sigma: &[Vec<f64>]) -> f64 {
    let sigma_w = mat_vec_mul(sigma, w);
    dot(w, &sigma_w).max(0.0).sqrt()
}

/// Map an unconstrained vector onto the unit simplex.
fn softmax(x: &[f64]) -> Vec<f64> {
    if x.is_empty() {
        return Vec::new();
    }
    let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if sum < 1e-15 {
        vec![1.0 / x.len() as f64; x.len()]
    } else {
        exps.iter().map(|&e| e / sum).collect()
    }
}
