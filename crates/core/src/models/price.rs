use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single closing-price data point (date → price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}
