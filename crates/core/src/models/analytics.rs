use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::asset::{AssetType, Currency};

/// Portfolio totals in the reporting currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Sum of KRW purchase values (each at its purchase-time rate)
    pub total_purchase: f64,

    /// Sum of KRW current values
    pub total_current: f64,
}

/// Aggregate breakdown of the whole portfolio at the current rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    /// Total portfolio value in KRW
    pub total_value: f64,

    /// Percent of total value per asset category
    pub asset_allocation: HashMap<AssetType, f64>,

    /// Percent of total value per transaction currency
    pub currency_exposure: HashMap<Currency, f64>,

    /// Gain/loss in KRW attributable purely to exchange-rate movement,
    /// per foreign currency
    pub exchange_gain_loss: HashMap<Currency, f64>,
}

/// One instrument's solved weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentWeight {
    pub symbol: String,

    /// Fraction of the portfolio, in [0, 1]. Full precision — round only
    /// for display.
    pub weight: f64,
}

impl InstrumentWeight {
    /// Weight as a percentage rounded to one decimal, for display.
    pub fn display_pct(&self) -> f64 {
        (self.weight * 1000.0).round() / 10.0
    }
}

/// Result of a mean-variance optimization run. Transient — computed on
/// demand, never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Solved weights, one per instrument that had usable history
    pub weights: Vec<InstrumentWeight>,

    /// Annualized expected portfolio return at the solved weights
    pub expected_return: f64,

    /// Annualized portfolio standard deviation at the solved weights
    pub risk: f64,

    /// Instruments dropped for missing/empty price history
    #[serde(default)]
    pub skipped_symbols: Vec<String>,
}

/// Trade direction suggested by the rebalancing comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    /// Underweight — acquire more
    Buy,
    /// Overweight — reduce
    Sell,
    /// Already on target
    Hold,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "Buy"),
            TradeAction::Sell => write!(f, "Sell"),
            TradeAction::Hold => write!(f, "Hold"),
        }
    }
}

/// One row of a rebalancing comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceItem {
    /// Asset-type name or instrument symbol, depending on granularity
    pub label: String,

    /// Current weight, percent
    pub current_pct: f64,

    /// Target weight, percent
    pub target_pct: f64,

    /// `target_pct - current_pct`; positive means underweight (buy)
    pub delta_pct: f64,

    pub action: TradeAction,

    /// Suggested trade size in KRW: `|delta| × total value / 100`
    pub amount: f64,

    /// Whether the delta exceeds the actionability threshold for this
    /// granularity
    pub actionable: bool,
}
