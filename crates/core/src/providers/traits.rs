use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::Currency;
use crate::models::price::PricePoint;

/// Source of historical closing prices for an instrument.
///
/// The optimizer only ever sees the returned series; how prices are
/// retrieved (API, cache, fixture) is entirely the implementation's
/// concern. An empty result means "no data for this instrument" — the
/// optimizer drops the instrument rather than aborting.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Daily closing prices for `symbol` over a trailing window
    /// (e.g. "6mo", "1y"). Sorted by date, oldest first.
    async fn history(&self, symbol: &str, period: &str) -> Result<Vec<PricePoint>, CoreError>;
}

/// Source of the current exchange rate between two currencies.
///
/// Valuation functions take rates as plain parameters; this trait is
/// how the facade obtains them. Fallback to a cached or default rate on
/// failure is the rate service's job, not the provider's.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// The latest `base` → `quote` rate. Must be finite and positive.
    async fn current_rate(&self, base: Currency, quote: Currency) -> Result<f64, CoreError>;
}
