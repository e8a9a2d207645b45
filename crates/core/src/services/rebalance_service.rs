use std::collections::HashMap;

use crate::models::analytics::{InstrumentWeight, RebalanceItem, TradeAction};
use crate::models::asset::AssetType;

/// Deltas of at least this many percentage points are flagged actionable
/// at the asset-type granularity (preset-based rebalancing).
pub const PRESET_ACTION_THRESHOLD_PCT: f64 = 5.0;

/// Deltas of at least this many percentage points are flagged actionable
/// at the instrument granularity (optimizer-based rebalancing). Tighter
/// than the preset threshold on purpose: solved weights are precise
/// enough to act on smaller drifts.
pub const INSTRUMENT_ACTION_THRESHOLD_PCT: f64 = 1.0;

/// Built-in target allocations, percent per asset type, summing to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskProfile {
    /// Bond-heavy: capital preservation first
    Conservative,
    /// Equity-heavy: growth first
    Aggressive,
}

impl RiskProfile {
    /// Target percent for each asset type. Types not listed are 0.
    pub fn target_allocation(&self) -> HashMap<AssetType, f64> {
        let pairs: &[(AssetType, f64)] = match self {
            RiskProfile::Conservative => &[
                (AssetType::Equity, 30.0),
                (AssetType::Bond, 40.0),
                (AssetType::CashEquivalent, 15.0),
                (AssetType::Fund, 10.0),
                (AssetType::Commodity, 3.0),
                (AssetType::Gold, 2.0),
            ],
            RiskProfile::Aggressive => &[
                (AssetType::Equity, 60.0),
                (AssetType::Bond, 20.0),
                (AssetType::CashEquivalent, 5.0),
                (AssetType::Fund, 10.0),
                (AssetType::Commodity, 3.0),
                (AssetType::Gold, 2.0),
            ],
        };
        pairs.iter().copied().collect()
    }
}

/// Compares current weights against a target allocation and suggests
/// trades. Pure computation — no side effects, output is for display.
pub struct RebalanceService;

impl RebalanceService {
    pub fn new() -> Self {
        Self
    }

    /// Asset-type-level comparison against a preset profile.
    ///
    /// Emits one row per asset type (including on-target ones, flagged
    /// non-actionable) so the caller can render the full comparison
    /// table. Threshold: 5 percentage points.
    pub fn compare_to_preset(
        &self,
        current_by_type: &HashMap<AssetType, f64>,
        profile: RiskProfile,
        total_value: f64,
    ) -> Vec<RebalanceItem> {
        let target = profile.target_allocation();
        AssetType::ALL
            .iter()
            .map(|asset_type| {
                let current = current_by_type.get(asset_type).copied().unwrap_or(0.0);
                let goal = target.get(asset_type).copied().unwrap_or(0.0);
                build_item(
                    asset_type.to_string(),
                    current,
                    goal,
                    total_value,
                    PRESET_ACTION_THRESHOLD_PCT,
                )
            })
            .collect()
    }

    /// Instrument-level comparison against optimizer-derived weights.
    ///
    /// Covers the union of currently held and optimally weighted
    /// instruments; a held instrument absent from the optimal set gets a
    /// 0% target, and vice versa. Threshold: 1 percentage point.
    pub fn compare_to_optimal(
        &self,
        current_by_symbol: &HashMap<String, f64>,
        optimal: &[InstrumentWeight],
        total_value: f64,
    ) -> Vec<RebalanceItem> {
        let mut symbols: Vec<String> = current_by_symbol.keys().cloned().collect();
        for w in optimal {
            if !current_by_symbol.contains_key(&w.symbol) {
                symbols.push(w.symbol.clone());
            }
        }
        symbols.sort();

        let target_by_symbol: HashMap<&str, f64> = optimal
            .iter()
            .map(|w| (w.symbol.as_str(), w.weight * 100.0))
            .collect();

        symbols
            .into_iter()
            .map(|symbol| {
                let current = current_by_symbol.get(&symbol).copied().unwrap_or(0.0);
                let goal = target_by_symbol.get(symbol.as_str()).copied().unwrap_or(0.0);
                build_item(
                    symbol,
                    current,
                    goal,
                    total_value,
                    INSTRUMENT_ACTION_THRESHOLD_PCT,
                )
            })
            .collect()
    }
}

impl Default for RebalanceService {
    fn default() -> Self {
        Self::new()
    }
}

fn build_item(
    label: String,
    current_pct: f64,
    target_pct: f64,
    total_value: f64,
    threshold: f64,
) -> RebalanceItem {
    let delta_pct = target_pct - current_pct;
    let action = if delta_pct > 0.0 {
        TradeAction::Buy
    } else if delta_pct < 0.0 {
        TradeAction::Sell
    } else {
        TradeAction::Hold
    };
    RebalanceItem {
        label,
        current_pct,
        target_pct,
        delta_pct,
        action,
        amount: delta_pct.abs() * total_value / 100.0,
        actionable: delta_pct.abs() >= threshold,
    }
}
