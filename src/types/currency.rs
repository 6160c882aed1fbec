use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Fiat currencies the ticker source can convert into.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    Aud,
    Brl,
    Cad,
    Chf,
    Cny,
    #[default]
    Eur,
    Gbp,
    Hkd,
    Idr,
    Inr,
    Jpy,
    Krw,
    Mxn,
    Rub,
}

impl Currency {
    pub const ALL: [Currency; 14] = [
        Currency::Aud,
        Currency::Brl,
        Currency::Cad,
        Currency::Chf,
        Currency::Cny,
        Currency::Eur,
        Currency::Gbp,
        Currency::Hkd,
        Currency::Idr,
        Currency::Inr,
        Currency::Jpy,
        Currency::Krw,
        Currency::Mxn,
        Currency::Rub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Aud => "AUD",
            Currency::Brl => "BRL",
            Currency::Cad => "CAD",
            Currency::Chf => "CHF",
            Currency::Cny => "CNY",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Hkd => "HKD",
            Currency::Idr => "IDR",
            Currency::Inr => "INR",
            Currency::Jpy => "JPY",
            Currency::Krw => "KRW",
            Currency::Mxn => "MXN",
            Currency::Rub => "RUB",
        }
    }

    /// Field name carrying this currency's price in a ticker row, e.g. `price_eur`.
    pub fn price_field(&self) -> String {
        format!("price_{}", self.as_str().to_ascii_lowercase())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| format!("Unsupported currency: {}", s))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
