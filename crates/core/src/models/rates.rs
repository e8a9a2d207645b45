use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Last successfully fetched exchange rate, with its fetch time.
///
/// This is an explicit value object the caller owns and passes into rate
/// lookups — never ambient mutable state — so valuation stays testable
/// without a hosting framework. A rate is reused without a network call
/// while it is within the freshness window; a stale rate still serves as
/// the fallback when the provider is unreachable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateCache {
    rate: Option<f64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached rate if one was ever stored, fresh or not.
    pub fn last_rate(&self) -> Option<f64> {
        self.rate
    }

    /// The cached rate, only if it was fetched within `ttl_secs`.
    pub fn fresh_rate(&self, ttl_secs: u64, now: DateTime<Utc>) -> Option<f64> {
        let fetched_at = self.fetched_at?;
        if now - fetched_at <= Duration::seconds(ttl_secs as i64) {
            self.rate
        } else {
            None
        }
    }

    /// Store a newly fetched rate.
    pub fn store(&mut self, rate: f64, now: DateTime<Utc>) {
        self.rate = Some(rate);
        self.fetched_at = Some(now);
    }
}
