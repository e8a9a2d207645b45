use thiserror::Error;

/// Unified error type for the entire portfolio-insight-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
///
/// None of these are fatal to the hosting process — each is scoped to a
/// single computation request.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Valuation ───────────────────────────────────────────────────
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    // ── Optimization ────────────────────────────────────────────────
    #[error("Insufficient data for optimization: {0}")]
    InsufficientData(String),

    #[error("Optimization did not converge (attempted target: {target:?}) — try a lower target return")]
    OptimizationFailed {
        /// The target annual return that was requested, if any.
        /// Retrying with a lower target is the usual recovery.
        target: Option<f64>,
    },

    #[error("No price history available for {symbol}")]
    MissingPriceData { symbol: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so that
        // provider credentials never end up in logs or user-facing messages.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
