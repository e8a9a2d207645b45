use serde::{Deserialize, Serialize};

/// One instrument's daily fractional return series, already aligned to
/// the common observation dates shared by every instrument in the same
/// optimization request.
///
/// Derived fresh per request from price history — never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    /// Ticker symbol of the instrument
    pub symbol: String,

    /// Fractional day-over-day price changes, oldest first
    pub returns: Vec<f64>,
}

impl ReturnSeries {
    pub fn new(symbol: impl Into<String>, returns: Vec<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            returns,
        }
    }
}
