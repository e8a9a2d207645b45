use serde::{Deserialize, Serialize};

/// The category of an investment holding.
///
/// A closed enumeration: an invalid category is a compile-time error,
/// not a runtime string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Listed stocks (domestic or foreign)
    Equity,
    /// Government / corporate bonds
    Bond,
    /// Mutual funds and ETFs
    Fund,
    /// Deposits, money-market funds, and other cash-like instruments
    CashEquivalent,
    /// Cryptocurrencies
    Crypto,
    /// Raw commodities other than gold
    Commodity,
    /// Gold (tracked separately from other commodities)
    Gold,
    /// Anything that doesn't fit the categories above
    Other,
}

impl AssetType {
    /// All asset types, in display order. Used when a computation must
    /// cover every category (e.g., preset allocation comparison).
    pub const ALL: [AssetType; 8] = [
        AssetType::Equity,
        AssetType::Bond,
        AssetType::Fund,
        AssetType::CashEquivalent,
        AssetType::Crypto,
        AssetType::Commodity,
        AssetType::Gold,
        AssetType::Other,
    ];
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Equity => write!(f, "Equity"),
            AssetType::Bond => write!(f, "Bond"),
            AssetType::Fund => write!(f, "Fund"),
            AssetType::CashEquivalent => write!(f, "Cash Equivalent"),
            AssetType::Crypto => write!(f, "Crypto"),
            AssetType::Commodity => write!(f, "Commodity"),
            AssetType::Gold => write!(f, "Gold"),
            AssetType::Other => write!(f, "Other"),
        }
    }
}

/// Currency a holding is transacted in.
///
/// KRW is the reporting currency: all aggregate totals, weights, and
/// rebalancing amounts are expressed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Korean won — the reporting currency
    Krw,
    /// US dollar
    Usd,
}

impl Currency {
    /// Whether amounts in this currency need no conversion for reporting.
    pub fn is_reporting(&self) -> bool {
        matches!(self, Currency::Krw)
    }

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Krw => "KRW",
            Currency::Usd => "USD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
