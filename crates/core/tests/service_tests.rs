// ═══════════════════════════════════════════════════════════════════
// Service & Integration Tests — PortfolioInsight facade,
// ExchangeRateService fallback chain, end-to-end optimization
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use portfolio_insight_core::errors::CoreError;
use portfolio_insight_core::models::asset::{AssetType, Currency};
use portfolio_insight_core::models::holding::Holding;
use portfolio_insight_core::models::price::PricePoint;
use portfolio_insight_core::models::rates::RateCache;
use portfolio_insight_core::models::settings::Settings;
use portfolio_insight_core::providers::traits::{ExchangeRateProvider, PriceHistoryProvider};
use portfolio_insight_core::services::rate_service::ExchangeRateService;
use portfolio_insight_core::services::rebalance_service::RiskProfile;
use portfolio_insight_core::services::valuation_service::ReturnBasis;
use portfolio_insight_core::store::MemoryHoldingStore;
use portfolio_insight_core::PortfolioInsight;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// History provider backed by fixed per-symbol price series.
struct MockHistoryProvider {
    histories: HashMap<String, Vec<PricePoint>>,
}

impl MockHistoryProvider {
    fn new() -> Self {
        let mut histories = HashMap::new();
        // Deterministic daily closes over one common week.
        histories.insert("AAA".to_string(), prices(&[100.0, 101.0, 99.0, 100.5, 100.5, 102.5]));
        histories.insert("BBB".to_string(), prices(&[50.0, 50.0, 50.5, 50.0, 51.0, 50.75]));
        Self { histories }
    }
}

fn prices(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            date: date(2024, 3, 1 + i as u32),
            price,
        })
        .collect()
}

#[async_trait]
impl PriceHistoryProvider for MockHistoryProvider {
    fn name(&self) -> &str {
        "MockHistory"
    }

    async fn history(&self, symbol: &str, _period: &str) -> Result<Vec<PricePoint>, CoreError> {
        self.histories
            .get(symbol)
            .cloned()
            .ok_or_else(|| CoreError::MissingPriceData {
                symbol: symbol.to_string(),
            })
    }
}

/// Rate provider with a fixed answer, or a permanent failure.
struct MockRateProvider {
    rate: Option<f64>,
}

#[async_trait]
impl ExchangeRateProvider for MockRateProvider {
    fn name(&self) -> &str {
        "MockRates"
    }

    async fn current_rate(&self, _base: Currency, _quote: Currency) -> Result<f64, CoreError> {
        self.rate.ok_or_else(|| CoreError::Api {
            provider: "MockRates".into(),
            message: "provider down".into(),
        })
    }
}

fn tracker(rate: Option<f64>) -> PortfolioInsight {
    PortfolioInsight::new(
        Box::new(MemoryHoldingStore::new()),
        Box::new(MockHistoryProvider::new()),
        Box::new(MockRateProvider { rate }),
        Settings::default(),
    )
}

fn usd_equity(name: &str, symbol: &str, purchase: f64, current: f64) -> Holding {
    Holding::foreign(
        name,
        AssetType::Equity,
        Currency::Usd,
        purchase,
        current,
        1300.0,
        1400.0,
        date(2024, 1, 15),
    )
    .with_symbol(symbol)
}

// ═══════════════════════════════════════════════════════════════════
// Facade: CRUD & valuation
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    #[test]
    fn add_list_update_remove() {
        let mut tracker = tracker(Some(1380.0));

        let id = tracker
            .add_holding(usd_equity("US Equity", "AAA", 1000.0, 1100.0))
            .unwrap();
        assert_eq!(tracker.holding_count(), 1);

        let mut replacement = usd_equity("US Equity", "AAA", 1000.0, 1200.0);
        replacement.memo = Some("rebought".into());
        tracker.update_holding(id, replacement).unwrap();
        assert_eq!(tracker.get_holding(id).unwrap().current_amount, 1200.0);

        tracker.remove_holding(id).unwrap();
        assert_eq!(tracker.holding_count(), 0);
    }

    #[test]
    fn add_rejects_invalid_holdings() {
        let mut tracker = tracker(Some(1380.0));
        let mut bad = usd_equity("US Equity", "AAA", 1000.0, 1100.0);
        bad.purchase_rate = Some(3.0); // far outside the plausible band
        assert!(matches!(
            tracker.add_holding(bad),
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(tracker.holding_count(), 0);
    }

    #[test]
    fn totals_and_weights_use_stored_rates() {
        let mut tracker = tracker(Some(1380.0));
        tracker
            .add_holding(Holding::domestic(
                "Deposit",
                AssetType::CashEquivalent,
                1_000_000.0,
                1_000_000.0,
                date(2024, 2, 1),
            ))
            .unwrap();
        tracker
            .add_holding(usd_equity("US Equity", "AAA", 1000.0, 1000.0))
            .unwrap();

        let totals = tracker.totals().unwrap();
        assert!((totals.total_purchase - 2_300_000.0).abs() < 1e-6);
        assert!((totals.total_current - 2_400_000.0).abs() < 1e-6);

        let weights = tracker.weights().unwrap();
        let sum: f64 = weights.values().sum();
        assert!((sum - 100.0).abs() <= 0.2);
    }

    #[test]
    fn returns_and_exchange_effect_by_id() {
        let mut tracker = tracker(Some(1380.0));
        let id = tracker
            .add_holding(usd_equity("US Equity", "AAA", 1000.0, 1000.0))
            .unwrap();

        let native = tracker.holding_return(id, ReturnBasis::Native).unwrap().unwrap();
        assert_eq!(native, 0.0);

        let reporting = tracker
            .holding_return(id, ReturnBasis::Reporting)
            .unwrap()
            .unwrap();
        assert!((reporting - 100.0 / 13.0).abs() < 1e-9);

        let effect = tracker.exchange_effect(id).unwrap();
        assert!((effect - 100.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_holding_id_is_reported() {
        let tracker = tracker(Some(1380.0));
        assert!(matches!(
            tracker.holding_return(Uuid::new_v4(), ReturnBasis::Native),
            Err(CoreError::HoldingNotFound(_))
        ));
    }

    #[tokio::test]
    async fn analysis_at_live_rate_applies_one_rate_uniformly() {
        let mut tracker = tracker(Some(1350.0));
        tracker
            .add_holding(usd_equity("US Equity", "AAA", 1000.0, 1000.0))
            .unwrap();

        let analysis = tracker.analysis_at_live_rate().await.unwrap();
        assert!((analysis.total_value - 1_350_000.0).abs() < 1e-6);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Exchange rate fallback chain
// ═══════════════════════════════════════════════════════════════════

mod rates {
    use super::*;

    #[tokio::test]
    async fn live_rate_is_used_and_cached() {
        let service = ExchangeRateService::new(
            Box::new(MockRateProvider { rate: Some(1385.5) }),
            1300.0,
            300,
        );
        let mut cache = RateCache::new();
        let rate = service
            .current_rate(Currency::Usd, Currency::Krw, &mut cache)
            .await;
        assert_eq!(rate, 1385.5);
        assert_eq!(cache.last_rate(), Some(1385.5));
    }

    #[tokio::test]
    async fn fresh_cache_short_circuits_the_provider() {
        // Provider is down, but the cache is fresh — no fallback needed.
        let service = ExchangeRateService::new(
            Box::new(MockRateProvider { rate: None }),
            1300.0,
            300,
        );
        let mut cache = RateCache::new();
        cache.store(1390.0, Utc::now());
        let rate = service
            .current_rate(Currency::Usd, Currency::Krw, &mut cache)
            .await;
        assert_eq!(rate, 1390.0);
    }

    #[tokio::test]
    async fn stale_cache_is_the_fallback_when_the_provider_fails() {
        let service = ExchangeRateService::new(
            Box::new(MockRateProvider { rate: None }),
            1300.0,
            300,
        );
        let mut cache = RateCache::new();
        cache.store(1410.0, Utc::now() - Duration::seconds(3600));
        let rate = service
            .current_rate(Currency::Usd, Currency::Krw, &mut cache)
            .await;
        assert_eq!(rate, 1410.0);
    }

    #[tokio::test]
    async fn default_rate_is_the_last_resort() {
        let service = ExchangeRateService::new(
            Box::new(MockRateProvider { rate: None }),
            1300.0,
            300,
        );
        let mut cache = RateCache::new();
        let rate = service
            .current_rate(Currency::Usd, Currency::Krw, &mut cache)
            .await;
        assert_eq!(rate, 1300.0);
    }

    #[tokio::test]
    async fn implausible_provider_rates_are_rejected() {
        let service = ExchangeRateService::new(
            Box::new(MockRateProvider { rate: Some(-5.0) }),
            1300.0,
            300,
        );
        let mut cache = RateCache::new();
        let rate = service
            .current_rate(Currency::Usd, Currency::Krw, &mut cache)
            .await;
        assert_eq!(rate, 1300.0);
        assert_eq!(cache.last_rate(), None);
    }

    #[tokio::test]
    async fn identity_pair_needs_no_provider() {
        let service = ExchangeRateService::new(
            Box::new(MockRateProvider { rate: None }),
            1300.0,
            300,
        );
        let mut cache = RateCache::new();
        let rate = service
            .current_rate(Currency::Krw, Currency::Krw, &mut cache)
            .await;
        assert_eq!(rate, 1.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// End-to-end optimization & rebalancing
// ═══════════════════════════════════════════════════════════════════

mod optimization {
    use super::*;

    #[tokio::test]
    async fn optimizes_over_held_symbols() {
        let mut tracker = tracker(Some(1380.0));
        tracker
            .add_holding(usd_equity("Alpha", "AAA", 1000.0, 1100.0))
            .unwrap();
        tracker
            .add_holding(usd_equity("Beta", "BBB", 2000.0, 2100.0))
            .unwrap();

        let result = tracker.optimize(None).await.unwrap();
        assert_eq!(result.weights.len(), 2);
        assert!(result.skipped_symbols.is_empty());

        let sum: f64 = result.weights.iter().map(|w| w.weight).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(result.risk > 0.0);
    }

    #[tokio::test]
    async fn instruments_without_history_are_skipped_not_fatal() {
        let mut tracker = tracker(Some(1380.0));
        tracker
            .add_holding(usd_equity("Alpha", "AAA", 1000.0, 1100.0))
            .unwrap();
        tracker
            .add_holding(usd_equity("Beta", "BBB", 2000.0, 2100.0))
            .unwrap();
        // The mock has no data for "ZZZ"
        tracker
            .add_holding(usd_equity("Ghost", "ZZZ", 500.0, 500.0))
            .unwrap();

        let result = tracker.optimize(None).await.unwrap();
        assert_eq!(result.weights.len(), 2);
        assert_eq!(result.skipped_symbols, vec!["ZZZ".to_string()]);
    }

    #[tokio::test]
    async fn fewer_than_two_symbols_is_insufficient() {
        let mut tracker = tracker(Some(1380.0));
        tracker
            .add_holding(usd_equity("Alpha", "AAA", 1000.0, 1100.0))
            .unwrap();
        // No symbol → not an optimization candidate
        tracker
            .add_holding(Holding::domestic(
                "Deposit",
                AssetType::CashEquivalent,
                1_000_000.0,
                1_000_000.0,
                date(2024, 2, 1),
            ))
            .unwrap();

        assert!(matches!(
            tracker.optimize(None).await,
            Err(CoreError::InsufficientData(_))
        ));
    }

    #[tokio::test]
    async fn all_histories_failing_is_insufficient() {
        let mut tracker = tracker(Some(1380.0));
        tracker
            .add_holding(usd_equity("Ghost 1", "YYY", 1000.0, 1100.0))
            .unwrap();
        tracker
            .add_holding(usd_equity("Ghost 2", "ZZZ", 2000.0, 2100.0))
            .unwrap();

        assert!(matches!(
            tracker.optimize(None).await,
            Err(CoreError::InsufficientData(_))
        ));
    }

    #[tokio::test]
    async fn optimal_rebalance_compares_held_weights_to_solved_weights() {
        let mut tracker = tracker(Some(1380.0));
        // Everything in AAA; the minimum-variance mix certainly is not.
        tracker
            .add_holding(usd_equity("Alpha", "AAA", 1000.0, 1000.0))
            .unwrap();
        tracker
            .add_holding(usd_equity("Beta", "BBB", 1000.0, 0.01))
            .unwrap();

        let result = tracker.optimize(None).await.unwrap();
        let items = tracker.rebalance_with_optimal(&result).unwrap();

        assert_eq!(items.len(), 2);
        let aaa = items.iter().find(|i| i.label == "AAA").unwrap();
        assert!(aaa.current_pct > 99.0);
        assert!(aaa.actionable);
        assert!(aaa.delta_pct < 0.0, "AAA is overweight and should be sold");
    }

    #[test]
    fn preset_rebalance_flags_large_drifts() {
        let mut tracker = tracker(Some(1380.0));
        tracker
            .add_holding(usd_equity("Alpha", "AAA", 1000.0, 1000.0))
            .unwrap();

        let items = tracker.rebalance_with_preset(RiskProfile::Conservative).unwrap();
        let equity = items.iter().find(|i| i.label == "Equity").unwrap();
        assert_eq!(equity.current_pct, 100.0);
        assert_eq!(equity.target_pct, 30.0);
        assert!(equity.actionable);

        let bond = items.iter().find(|i| i.label == "Bond").unwrap();
        assert_eq!(bond.delta_pct, 40.0);
        assert!((bond.amount - 1_400_000.0 * 0.4).abs() < 1e-6);
    }
}
