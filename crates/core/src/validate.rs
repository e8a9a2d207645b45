//! Field-level validation applied before a holding enters the store.
//!
//! The computation services assume their inputs already passed these
//! checks and do not re-validate ranges.

use chrono::{Datelike, NaiveDate, Utc};

use crate::errors::CoreError;
use crate::models::holding::Holding;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_MEMO_LENGTH: usize = 1000;
pub const MAX_SYMBOL_LENGTH: usize = 20;

pub const MIN_AMOUNT: f64 = 0.01;
pub const MAX_AMOUNT: f64 = 999_999_999_999.99;

/// Plausible USD/KRW band. Anything outside is almost certainly a
/// data-entry mistake (e.g., entering won per dollar backwards).
pub const MIN_EXCHANGE_RATE: f64 = 500.0;
pub const MAX_EXCHANGE_RATE: f64 = 2000.0;

pub const MIN_YEAR: i32 = 1900;

/// Validate every field of a holding. Returns the first violation found.
pub fn validate_holding(holding: &Holding) -> Result<(), CoreError> {
    validate_name(&holding.name)?;

    if let Some(symbol) = &holding.symbol {
        validate_symbol(symbol)?;
    }

    validate_amount(holding.purchase_amount, "purchase amount")?;
    if holding.current_amount < 0.0 || !holding.current_amount.is_finite() {
        return Err(CoreError::ValidationError(format!(
            "current amount must be a non-negative number, got {}",
            holding.current_amount
        )));
    }
    if holding.current_amount > MAX_AMOUNT {
        return Err(CoreError::ValidationError(format!(
            "current amount must not exceed {MAX_AMOUNT}"
        )));
    }

    if let Some(qty) = holding.purchase_quantity {
        if !(0.0..=MAX_AMOUNT).contains(&qty) || !qty.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "purchase quantity must be in [0, {MAX_AMOUNT}], got {qty}"
            )));
        }
    }
    for (price, field) in [
        (holding.purchase_price, "purchase price"),
        (holding.current_price, "current price"),
    ] {
        if let Some(p) = price {
            if p < 0.0 || !p.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "{field} must be a non-negative number, got {p}"
                )));
            }
        }
    }

    validate_purchase_date(holding.purchase_date)?;

    if !holding.currency.is_reporting() {
        // Foreign holdings must carry a purchase-time rate; the current
        // rate may still be pending a refresh.
        match holding.purchase_rate {
            Some(rate) => validate_exchange_rate(rate, "purchase exchange rate")?,
            None => {
                return Err(CoreError::ValidationError(format!(
                    "purchase exchange rate is required for {} holdings",
                    holding.currency
                )))
            }
        }
        if let Some(rate) = holding.current_rate {
            validate_exchange_rate(rate, "current exchange rate")?;
        }
    }

    if let Some(memo) = &holding.memo {
        if memo.chars().count() > MAX_MEMO_LENGTH {
            return Err(CoreError::ValidationError(format!(
                "memo must not exceed {MAX_MEMO_LENGTH} characters"
            )));
        }
    }

    Ok(())
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError("name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::ValidationError(format!(
            "name must not exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Symbols are uppercase letters, digits, dots, and hyphens
/// (e.g., "005930.KS", "BTC-USD").
fn validate_symbol(symbol: &str) -> Result<(), CoreError> {
    if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(CoreError::ValidationError(format!(
            "symbol must be 1–{MAX_SYMBOL_LENGTH} characters"
        )));
    }
    let valid = symbol
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-');
    if !valid {
        return Err(CoreError::ValidationError(format!(
            "symbol '{symbol}' may only contain A-Z, 0-9, '.' and '-'"
        )));
    }
    Ok(())
}

fn validate_amount(amount: f64, field: &str) -> Result<(), CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::ValidationError(format!(
            "{field} must be a valid number"
        )));
    }
    if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
        return Err(CoreError::ValidationError(format!(
            "{field} must be between {MIN_AMOUNT} and {MAX_AMOUNT}, got {amount}"
        )));
    }
    Ok(())
}

fn validate_exchange_rate(rate: f64, field: &str) -> Result<(), CoreError> {
    if !rate.is_finite() || !(MIN_EXCHANGE_RATE..=MAX_EXCHANGE_RATE).contains(&rate) {
        return Err(CoreError::ValidationError(format!(
            "{field} must be between {MIN_EXCHANGE_RATE} and {MAX_EXCHANGE_RATE}, got {rate}"
        )));
    }
    Ok(())
}

fn validate_purchase_date(date: NaiveDate) -> Result<(), CoreError> {
    let today = Utc::now().date_naive();
    if date > today {
        return Err(CoreError::ValidationError(format!(
            "purchase date {date} must not be in the future"
        )));
    }
    if date.year() < MIN_YEAR {
        return Err(CoreError::ValidationError(format!(
            "purchase date {date} must not be before {MIN_YEAR}"
        )));
    }
    Ok(())
}
