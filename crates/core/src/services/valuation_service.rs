use std::collections::HashMap;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::analytics::{PortfolioAnalysis, PortfolioTotals};
use crate::models::asset::{AssetType, Currency};
use crate::models::holding::Holding;

/// Which exchange rate converts a holding's *current* amount to KRW.
///
/// The purchase side always uses each holding's own purchase-time rate;
/// only the current side has two legitimate policies. Callers pick one
/// explicitly per call site — the two are never mixed silently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentRateMode {
    /// Use the rate stored on each holding (`Holding::current_rate`).
    /// Right for stored analyses where each row was refreshed on edit.
    PerHolding,

    /// Apply one live rate uniformly to every non-KRW holding.
    /// Right when the caller just fetched a single fresh rate.
    Uniform(f64),
}

/// Which amounts a holding's percentage return is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnBasis {
    /// Native-currency amounts; isolates the instrument's own price move.
    Native,
    /// KRW amounts (purchase at the purchase-time rate, current at the
    /// current rate); what the owner actually experienced. Differs from
    /// `Native` whenever the currency has moved.
    Reporting,
}

/// Converts a heterogeneous set of holdings into a consistent KRW view
/// and splits gain/loss into price effect vs. currency effect.
///
/// Pure business logic — no I/O. Inputs are assumed to have passed
/// field-level validation (`crate::validate`); ranges are not re-checked
/// here.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Convert an amount to KRW. Identity for KRW amounts regardless of
    /// `rate`; otherwise multiplies by the supplied rate.
    pub fn to_reporting(
        &self,
        amount: f64,
        currency: Currency,
        rate: Option<f64>,
    ) -> Result<f64, CoreError> {
        if currency.is_reporting() {
            return Ok(amount);
        }
        match rate {
            Some(r) if r > 0.0 => Ok(amount * r),
            _ => Err(CoreError::InvalidRate(format!(
                "{currency} → KRW conversion requires a positive rate, got {rate:?}"
            ))),
        }
    }

    /// KRW purchase and current totals across all holdings.
    /// Zero holdings yields zero totals.
    pub fn compute_totals(
        &self,
        holdings: &[Holding],
        mode: CurrentRateMode,
    ) -> Result<PortfolioTotals, CoreError> {
        let mut totals = PortfolioTotals::default();
        for holding in holdings {
            totals.total_purchase +=
                self.to_reporting(holding.purchase_amount, holding.currency, holding.purchase_rate)?;
            totals.total_current += self.current_value(holding, mode)?;
        }
        Ok(totals)
    }

    /// Each holding's share of the total current KRW value, as a percent
    /// rounded to one decimal. A zero-valued portfolio gets all-zero
    /// weights rather than a division error; an empty one gets an empty
    /// map.
    pub fn compute_weights(
        &self,
        holdings: &[Holding],
        mode: CurrentRateMode,
    ) -> Result<HashMap<Uuid, f64>, CoreError> {
        let totals = self.compute_totals(holdings, mode)?;
        let mut weights = HashMap::with_capacity(holdings.len());

        for holding in holdings {
            let pct = if totals.total_current > 0.0 {
                let value = self.current_value(holding, mode)?;
                round1(value / totals.total_current * 100.0)
            } else {
                0.0
            };
            weights.insert(holding.id, pct);
        }

        Ok(weights)
    }

    /// The portion of a foreign holding's return attributable purely to
    /// exchange-rate movement: `(current_rate - purchase_rate) /
    /// purchase_rate × 100`. Zero for KRW holdings.
    pub fn exchange_effect(&self, holding: &Holding) -> Result<f64, CoreError> {
        if holding.currency.is_reporting() {
            return Ok(0.0);
        }
        let purchase_rate = positive_rate(holding.purchase_rate, holding, "purchase")?;
        let current_rate = positive_rate(holding.current_rate, holding, "current")?;
        Ok((current_rate - purchase_rate) / purchase_rate * 100.0)
    }

    /// Percentage return of one holding on the chosen basis.
    ///
    /// Returns `None` when the purchase amount (in the basis currency)
    /// is zero — the ratio is undefined, and callers decide how to
    /// render that, rather than receiving a misleading 0%.
    pub fn holding_return(
        &self,
        holding: &Holding,
        basis: ReturnBasis,
    ) -> Result<Option<f64>, CoreError> {
        let (purchase, current) = match basis {
            ReturnBasis::Native => (holding.purchase_amount, holding.current_amount),
            ReturnBasis::Reporting => (
                self.to_reporting(holding.purchase_amount, holding.currency, holding.purchase_rate)?,
                self.to_reporting(holding.current_amount, holding.currency, holding.current_rate)?,
            ),
        };

        if purchase == 0.0 {
            return Ok(None);
        }
        Ok(Some((current - purchase) / purchase * 100.0))
    }

    /// Aggregate breakdown: total KRW value, allocation percent per
    /// asset type, exposure percent per currency, and per-currency
    /// exchange gain/loss in KRW.
    pub fn analyze(
        &self,
        holdings: &[Holding],
        mode: CurrentRateMode,
    ) -> Result<PortfolioAnalysis, CoreError> {
        let mut total_value = 0.0;
        let mut by_type: HashMap<AssetType, f64> = HashMap::new();
        let mut by_currency: HashMap<Currency, f64> = HashMap::new();
        let mut fx_gain_loss: HashMap<Currency, f64> = HashMap::new();

        for holding in holdings {
            let value = self.current_value(holding, mode)?;
            total_value += value;
            *by_type.entry(holding.asset_type).or_insert(0.0) += value;
            *by_currency.entry(holding.currency).or_insert(0.0) += value;

            if !holding.currency.is_reporting() {
                let purchase_rate = positive_rate(holding.purchase_rate, holding, "purchase")?;
                let current_rate = match mode {
                    CurrentRateMode::PerHolding => {
                        positive_rate(holding.current_rate, holding, "current")?
                    }
                    CurrentRateMode::Uniform(rate) => rate,
                };
                // Currency effect on the current native amount: what the
                // same amount is worth now vs. at the purchase-time rate.
                let gain = holding.current_amount * (current_rate - purchase_rate);
                *fx_gain_loss.entry(holding.currency).or_insert(0.0) += gain;
            }
        }

        let to_pct = |sum: f64| {
            if total_value > 0.0 {
                sum / total_value * 100.0
            } else {
                0.0
            }
        };
        let asset_allocation = by_type.into_iter().map(|(k, v)| (k, to_pct(v))).collect();
        let currency_exposure = by_currency.into_iter().map(|(k, v)| (k, to_pct(v))).collect();

        Ok(PortfolioAnalysis {
            total_value,
            asset_allocation,
            currency_exposure,
            exchange_gain_loss: fx_gain_loss,
        })
    }

    /// KRW current value of one holding under the chosen rate mode.
    fn current_value(&self, holding: &Holding, mode: CurrentRateMode) -> Result<f64, CoreError> {
        match mode {
            CurrentRateMode::PerHolding => {
                self.to_reporting(holding.current_amount, holding.currency, holding.current_rate)
            }
            CurrentRateMode::Uniform(rate) => {
                self.to_reporting(holding.current_amount, holding.currency, Some(rate))
            }
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

fn positive_rate(rate: Option<f64>, holding: &Holding, which: &str) -> Result<f64, CoreError> {
    match rate {
        Some(r) if r > 0.0 => Ok(r),
        _ => Err(CoreError::InvalidRate(format!(
            "holding '{}' has no usable {which} rate for {}",
            holding.name, holding.currency
        ))),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
