pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;
pub mod validate;

use std::collections::HashMap;

use uuid::Uuid;

use errors::CoreError;
use models::{
    analytics::{OptimizationResult, PortfolioAnalysis, PortfolioTotals, RebalanceItem},
    asset::Currency,
    holding::Holding,
    rates::RateCache,
    settings::Settings,
};
use providers::{
    frankfurter::FrankfurterProvider,
    traits::{ExchangeRateProvider, PriceHistoryProvider},
    yahoo_finance::YahooFinanceProvider,
};
use services::{
    optimizer_service::OptimizerService,
    rate_service::ExchangeRateService,
    rebalance_service::{RebalanceService, RiskProfile},
    valuation_service::{CurrentRateMode, ReturnBasis, ValuationService},
};
use store::{HoldingStore, MemoryHoldingStore};

/// Main entry point for the Portfolio Insight core library.
///
/// Owns the holdings store and all services needed to value, optimize,
/// and rebalance a portfolio. Each operation is a synchronous
/// request/response computation (the only `await` points are provider
/// calls); nothing here runs in the background or mutates shared state
/// concurrently. A host serving multiple users must serialize holding
/// mutations per portfolio.
#[must_use]
pub struct PortfolioInsight {
    store: Box<dyn HoldingStore>,
    settings: Settings,
    valuation: ValuationService,
    optimizer: OptimizerService,
    rebalancer: RebalanceService,
    rates: ExchangeRateService,
    prices: Box<dyn PriceHistoryProvider>,
    /// Last fetched USD/KRW rate — an explicit value, not ambient state.
    rate_cache: RateCache,
}

impl std::fmt::Debug for PortfolioInsight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioInsight")
            .field("holdings", &self.store.list().len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl PortfolioInsight {
    /// Assemble a tracker from explicit collaborators. Tests inject mock
    /// providers and stores here.
    pub fn new(
        store: Box<dyn HoldingStore>,
        prices: Box<dyn PriceHistoryProvider>,
        rate_provider: Box<dyn ExchangeRateProvider>,
        settings: Settings,
    ) -> Self {
        let rates = ExchangeRateService::new(
            rate_provider,
            settings.default_usd_krw_rate,
            settings.rate_cache_ttl_secs,
        );
        Self {
            store,
            settings,
            valuation: ValuationService::new(),
            optimizer: OptimizerService::new(),
            rebalancer: RebalanceService::new(),
            rates,
            prices,
            rate_cache: RateCache::new(),
        }
    }

    /// Empty in-memory portfolio wired to the default live providers
    /// (Yahoo Finance history, Frankfurter rates).
    pub fn with_defaults() -> Result<Self, CoreError> {
        Ok(Self::new(
            Box::new(MemoryHoldingStore::new()),
            Box::new(YahooFinanceProvider::new()?),
            Box::new(FrankfurterProvider::new()),
            Settings::default(),
        ))
    }

    // ── Holdings CRUD ───────────────────────────────────────────────

    /// Validate and store a new holding. Returns its id.
    pub fn add_holding(&mut self, holding: Holding) -> Result<Uuid, CoreError> {
        validate::validate_holding(&holding)?;
        Ok(self.store.create(holding))
    }

    /// Validate a replacement and overwrite an existing holding's fields.
    pub fn update_holding(&mut self, id: Uuid, holding: Holding) -> Result<(), CoreError> {
        validate::validate_holding(&holding)?;
        self.store.update(id, holding)
    }

    /// Remove a holding.
    pub fn remove_holding(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete(id)
    }

    #[must_use]
    pub fn get_holding(&self, id: Uuid) -> Option<Holding> {
        self.store.get(id)
    }

    /// All holdings, oldest purchase first.
    #[must_use]
    pub fn list_holdings(&self) -> Vec<Holding> {
        self.store.list()
    }

    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.store.list().len()
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// KRW purchase/current totals using each holding's stored rates.
    pub fn totals(&self) -> Result<PortfolioTotals, CoreError> {
        self.valuation
            .compute_totals(&self.store.list(), CurrentRateMode::PerHolding)
    }

    /// Per-holding weight percent of the current KRW value, using each
    /// holding's stored rates.
    pub fn weights(&self) -> Result<HashMap<Uuid, f64>, CoreError> {
        self.valuation
            .compute_weights(&self.store.list(), CurrentRateMode::PerHolding)
    }

    /// Aggregate breakdown (allocation, currency exposure, exchange
    /// gain/loss) at each holding's stored current rate. This is the
    /// stored-analysis path; for a view at one live rate use
    /// [`analysis_at_live_rate`](Self::analysis_at_live_rate).
    pub fn analysis(&self) -> Result<PortfolioAnalysis, CoreError> {
        self.valuation
            .analyze(&self.store.list(), CurrentRateMode::PerHolding)
    }

    /// Aggregate breakdown with one freshly fetched USD/KRW rate applied
    /// uniformly to every foreign holding.
    pub async fn analysis_at_live_rate(&mut self) -> Result<PortfolioAnalysis, CoreError> {
        let rate = self.current_usd_krw_rate().await;
        self.valuation
            .analyze(&self.store.list(), CurrentRateMode::Uniform(rate))
    }

    /// Percentage return of one holding on the chosen basis. `None`
    /// when the purchase amount is zero (undefined, not 0%).
    pub fn holding_return(
        &self,
        id: Uuid,
        basis: ReturnBasis,
    ) -> Result<Option<f64>, CoreError> {
        let holding = self
            .store
            .get(id)
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))?;
        self.valuation.holding_return(&holding, basis)
    }

    /// Currency-driven return percent of one holding.
    pub fn exchange_effect(&self, id: Uuid) -> Result<f64, CoreError> {
        let holding = self
            .store
            .get(id)
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))?;
        self.valuation.exchange_effect(&holding)
    }

    // ── Exchange rates ──────────────────────────────────────────────

    /// Current USD → KRW rate via the provider, with cached-then-default
    /// fallback. Never fails.
    pub async fn current_usd_krw_rate(&mut self) -> f64 {
        self.rates
            .current_rate(Currency::Usd, Currency::Krw, &mut self.rate_cache)
            .await
    }

    // ── Optimization ────────────────────────────────────────────────

    /// Mean-variance optimization over every distinct symbol in the
    /// portfolio, using the configured history period.
    ///
    /// `target_return` is an annualized fraction (e.g. 0.08 for 8%);
    /// `None` solves the minimum-variance portfolio. Instruments whose
    /// history cannot be fetched (or comes back empty) are dropped with
    /// a warning and listed in the result's `skipped_symbols`; the
    /// optimization proceeds on the rest.
    pub async fn optimize(
        &self,
        target_return: Option<f64>,
    ) -> Result<OptimizationResult, CoreError> {
        let symbols = self.distinct_symbols();
        if symbols.len() < 2 {
            return Err(CoreError::InsufficientData(format!(
                "need at least 2 holdings with symbols to optimize, got {}",
                symbols.len()
            )));
        }

        let mut histories = Vec::with_capacity(symbols.len());
        let mut skipped = Vec::new();
        for symbol in symbols {
            match self
                .prices
                .history(&symbol, &self.settings.history_period)
                .await
            {
                Ok(points) if points.len() >= 2 => histories.push((symbol, points)),
                Ok(_) => {
                    log::warn!("no usable price history for {symbol}; dropping from optimization");
                    skipped.push(symbol);
                }
                Err(e) => {
                    log::warn!("failed to fetch history for {symbol}: {e}; dropping from optimization");
                    skipped.push(symbol);
                }
            }
        }

        let series = self.optimizer.build_return_series(&histories)?;
        let mut result = self.optimizer.solve(&series, target_return)?;
        result.skipped_symbols = skipped;
        Ok(result)
    }

    // ── Rebalancing ─────────────────────────────────────────────────

    /// Compare the current asset-type allocation (stored rates) against
    /// a preset profile. Actionable at ≥ 5 percentage points.
    pub fn rebalance_with_preset(
        &self,
        profile: RiskProfile,
    ) -> Result<Vec<RebalanceItem>, CoreError> {
        let analysis = self.analysis()?;
        Ok(self.rebalancer.compare_to_preset(
            &analysis.asset_allocation,
            profile,
            analysis.total_value,
        ))
    }

    /// Compare current per-instrument weights against optimizer-derived
    /// weights. Actionable at ≥ 1 percentage point.
    ///
    /// Weights (and suggested amounts) are relative to the
    /// symbol-bearing part of the portfolio, since that is the sleeve
    /// the optimizer allocated.
    pub fn rebalance_with_optimal(
        &self,
        optimal: &OptimizationResult,
    ) -> Result<Vec<RebalanceItem>, CoreError> {
        let (current_by_symbol, sleeve_value) = self.instrument_weights()?;
        Ok(self
            .rebalancer
            .compare_to_optimal(&current_by_symbol, &optimal.weights, sleeve_value))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Distinct ticker symbols across holdings, in stored order.
    fn distinct_symbols(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.store
            .list()
            .iter()
            .filter_map(|h| h.symbol.clone())
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }

    /// Current weight percent per symbol over the symbol-bearing
    /// holdings, plus that sleeve's total KRW value.
    fn instrument_weights(&self) -> Result<(HashMap<String, f64>, f64), CoreError> {
        let mut value_by_symbol: HashMap<String, f64> = HashMap::new();
        let mut sleeve_value = 0.0;

        for holding in self.store.list() {
            let Some(symbol) = holding.symbol.clone() else {
                continue;
            };
            let value = self.valuation.to_reporting(
                holding.current_amount,
                holding.currency,
                holding.current_rate,
            )?;
            *value_by_symbol.entry(symbol).or_insert(0.0) += value;
            sleeve_value += value;
        }

        let weights = value_by_symbol
            .into_iter()
            .map(|(symbol, value)| {
                let pct = if sleeve_value > 0.0 {
                    value / sleeve_value * 100.0
                } else {
                    0.0
                };
                (symbol, pct)
            })
            .collect();

        Ok((weights, sleeve_value))
    }
}
