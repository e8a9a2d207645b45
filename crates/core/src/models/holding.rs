use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::{AssetType, Currency};

/// A single investment holding.
///
/// Amounts (`purchase_amount`, `current_amount`) and unit prices are in
/// the holding's **native** currency. For non-KRW holdings the two
/// exchange rates convert native amounts to KRW: `purchase_rate` is the
/// rate at purchase time, `current_rate` the latest known rate. Both are
/// required and positive whenever `currency != Krw`.
///
/// Holdings are mutated in place on edit (all fields replaced) and
/// removed on explicit delete; no history is kept here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier (assigned on creation)
    pub id: Uuid,

    /// Ticker symbol, uppercased (e.g., "005930.KS", "AAPL", "BTC-USD").
    /// Optional — funds and deposits often have none.
    #[serde(default)]
    pub symbol: Option<String>,

    /// Human-readable product name
    pub name: String,

    /// Asset category
    pub asset_type: AssetType,

    /// Currency the holding is transacted in
    pub currency: Currency,

    /// Units purchased, if applicable
    #[serde(default)]
    pub purchase_quantity: Option<f64>,

    /// Unit price at purchase, native currency
    #[serde(default)]
    pub purchase_price: Option<f64>,

    /// Latest unit price, native currency
    #[serde(default)]
    pub current_price: Option<f64>,

    /// Total amount invested, native currency
    pub purchase_amount: f64,

    /// Latest total valuation, native currency
    pub current_amount: f64,

    /// Native → KRW rate at purchase time (non-KRW holdings only)
    #[serde(default)]
    pub purchase_rate: Option<f64>,

    /// Latest native → KRW rate (non-KRW holdings only)
    #[serde(default)]
    pub current_rate: Option<f64>,

    /// Purchase date (daily granularity)
    pub purchase_date: NaiveDate,

    /// Optional free-text memo
    #[serde(default)]
    pub memo: Option<String>,
}

impl Holding {
    /// Create a KRW-denominated holding. No exchange rates involved.
    pub fn domestic(
        name: impl Into<String>,
        asset_type: AssetType,
        purchase_amount: f64,
        current_amount: f64,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: None,
            name: name.into(),
            asset_type,
            currency: Currency::Krw,
            purchase_quantity: None,
            purchase_price: None,
            current_price: None,
            purchase_amount,
            current_amount,
            purchase_rate: None,
            current_rate: None,
            purchase_date,
            memo: None,
        }
    }

    /// Create a foreign-currency holding with both exchange rates.
    pub fn foreign(
        name: impl Into<String>,
        asset_type: AssetType,
        currency: Currency,
        purchase_amount: f64,
        current_amount: f64,
        purchase_rate: f64,
        current_rate: f64,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: None,
            name: name.into(),
            asset_type,
            currency,
            purchase_quantity: None,
            purchase_price: None,
            current_price: None,
            purchase_amount,
            current_amount,
            purchase_rate: Some(purchase_rate),
            current_rate: Some(current_rate),
            purchase_date,
            memo: None,
        }
    }

    /// Attach a ticker symbol (uppercased).
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into().to_uppercase());
        self
    }

    /// Attach a memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Attach quantity and unit prices.
    pub fn with_prices(
        mut self,
        quantity: f64,
        purchase_price: f64,
        current_price: f64,
    ) -> Self {
        self.purchase_quantity = Some(quantity);
        self.purchase_price = Some(purchase_price);
        self.current_price = Some(current_price);
        self
    }
}
