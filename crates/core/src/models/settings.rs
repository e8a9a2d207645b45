use serde::{Deserialize, Serialize};

/// User-configurable settings held by the facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// USD → KRW rate used when no live rate is available and nothing is
    /// cached.
    pub default_usd_krw_rate: f64,

    /// How long (seconds) a fetched exchange rate is reused without
    /// re-querying the provider.
    pub rate_cache_ttl_secs: u64,

    /// Price-history window requested for optimization (Yahoo range
    /// string, e.g. "6mo", "1y", "5y").
    pub history_period: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_usd_krw_rate: 1300.0,
            rate_cache_ttl_secs: 300,
            history_period: "1y".to_string(),
        }
    }
}
