use chrono::Utc;
use log::warn;

use crate::models::asset::Currency;
use crate::models::rates::RateCache;
use crate::providers::traits::ExchangeRateProvider;

/// Supplies the current exchange rate with a three-step fallback chain:
///
/// 1. the cached rate, if fetched within the freshness window;
/// 2. a live rate from the provider (validated finite and positive),
///    which also refreshes the cache;
/// 3. on provider failure, the last cached rate even if stale, and
///    failing that the configured default.
///
/// The lookup itself never fails — valuation should degrade to a
/// plausible rate, not abort. Fallbacks are logged.
pub struct ExchangeRateService {
    provider: Box<dyn ExchangeRateProvider>,
    default_rate: f64,
    ttl_secs: u64,
}

impl ExchangeRateService {
    pub fn new(provider: Box<dyn ExchangeRateProvider>, default_rate: f64, ttl_secs: u64) -> Self {
        Self {
            provider,
            default_rate,
            ttl_secs,
        }
    }

    /// Current `base` → `quote` rate, updating `cache` on a successful
    /// fetch.
    pub async fn current_rate(
        &self,
        base: Currency,
        quote: Currency,
        cache: &mut RateCache,
    ) -> f64 {
        if base == quote {
            return 1.0;
        }

        let now = Utc::now();
        if let Some(rate) = cache.fresh_rate(self.ttl_secs, now) {
            return rate;
        }

        match self.provider.current_rate(base, quote).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                cache.store(rate, now);
                rate
            }
            Ok(rate) => {
                warn!(
                    "{} returned implausible {base}/{quote} rate {rate}; falling back",
                    self.provider.name()
                );
                self.fallback(base, quote, cache)
            }
            Err(e) => {
                warn!(
                    "{} failed for {base}/{quote}: {e}; falling back",
                    self.provider.name()
                );
                self.fallback(base, quote, cache)
            }
        }
    }

    fn fallback(&self, base: Currency, quote: Currency, cache: &RateCache) -> f64 {
        match cache.last_rate() {
            Some(rate) => rate,
            None => {
                warn!(
                    "no cached {base}/{quote} rate; using default {}",
                    self.default_rate
                );
                self.default_rate
            }
        }
    }
}
