use serde::Serialize;
use thiserror::Error;

use super::currency::Currency;

/// Why a query segment could not be valued.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum HoldingError {
    #[error("expected SYMBOL*AMOUNT*PRICE, got {0:?}")]
    Malformed(String),

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("no current price for {0}")]
    UnknownSymbol(String),
}

/// One purchase declared in the query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub coin_symbol: String,
    pub currency: Currency,
    pub amount_bought: f64,
    pub bought_for: f64,
    pub invested: f64,
}

/// A holding priced against the rate cache, values rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    pub current_value_of_one: f64,
    pub current_value_of_all: f64,
    pub difference: f64,
    pub percentage_difference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HoldingRow {
    Valued(ValuedHolding),
    Failed { segment: String, error: HoldingError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioTotals {
    pub invested_value: f64,
    pub current_value: f64,
    pub difference_value: f64,
    pub percentage_difference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    pub currency: Currency,
    pub rows: Vec<HoldingRow>,
    pub totals: PortfolioTotals,
}
