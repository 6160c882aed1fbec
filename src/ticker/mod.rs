pub mod coinmarketcap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::{AssetRate, Currency};

pub use coinmarketcap::CoinMarketCapSource;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Ticker responded with status {0}")]
    Status(u16),

    #[error("Ticker returned something other than a JSON array")]
    NotAnArray,

    #[error("Ticker body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ticker did not answer within {0:?}")]
    Timeout(std::time::Duration),
}

/// Where the rate cache gets its prices from.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Top `limit` assets by market cap, priced in USD and `currency`.
    async fn fetch(&self, currency: Currency, limit: usize)
        -> Result<Vec<AssetRate>, UpstreamError>;
}

/// Parses a ticker body: a JSON array of objects carrying `name`, `symbol`,
/// `price_usd` and `price_<currency>`. At most `limit` rows are kept even if
/// the upstream ignored the requested limit.
pub fn parse_ticker_body(
    body: &str,
    currency: Currency,
    limit: usize,
) -> Result<Vec<AssetRate>, UpstreamError> {
    if !body.trim_start().starts_with('[') {
        return Err(UpstreamError::NotAnArray);
    }
    let rows: Vec<Value> = serde_json::from_str(body)?;
    let price_field = currency.price_field();

    Ok(rows
        .iter()
        .take(limit)
        .map(|row| AssetRate {
            name: text_field(row, "name"),
            symbol: text_field(row, "symbol"),
            price_usd: price(row, "price_usd"),
            price: price(row, &price_field),
        })
        .collect())
}

fn text_field(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// Prices come back as decimal strings, occasionally as numbers or null.
fn price(row: &Value, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::String(raw) => raw.trim().parse().ok().filter(|p: &f64| p.is_finite()),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[
        {"id": "bitcoin", "name": "Bitcoin", "symbol": "BTC", "rank": "1",
         "price_usd": "6500.12", "price_btc": "1.0", "price_eur": "5600.5"},
        {"id": "ethereum", "name": "Ethereum", "symbol": "ETH", "rank": "2",
         "price_usd": 210.3, "price_eur": null},
        {"id": "odd", "name": "Odd", "symbol": "ODD", "price_usd": "n/a"}
    ]"#;

    #[test]
    fn parses_string_and_numeric_prices() {
        let assets = parse_ticker_body(BODY, Currency::Eur, 200).unwrap();
        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].name, "Bitcoin");
        assert_eq!(assets[0].symbol, "BTC");
        assert_eq!(assets[0].price_usd, Some(6500.12));
        assert_eq!(assets[0].price, Some(5600.5));
        assert_eq!(assets[1].price_usd, Some(210.3));
    }

    #[test]
    fn missing_or_unreadable_prices_are_absent() {
        let assets = parse_ticker_body(BODY, Currency::Eur, 200).unwrap();
        assert_eq!(assets[1].price, None);
        assert_eq!(assets[2].price_usd, None);
        assert_eq!(assets[2].price, None);
    }

    #[test]
    fn uses_the_requested_currency_field() {
        let body = r#"[{"name": "Bitcoin", "symbol": "BTC", "price_usd": "1", "price_eur": "2", "price_jpy": "300"}]"#;
        let assets = parse_ticker_body(body, Currency::Jpy, 200).unwrap();
        assert_eq!(assets[0].price, Some(300.0));
    }

    #[test]
    fn keeps_at_most_limit_rows() {
        let assets = parse_ticker_body(BODY, Currency::Eur, 2).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[1].symbol, "ETH");
    }

    #[test]
    fn rejects_non_array_bodies() {
        let err = parse_ticker_body(r#"{"error": "id not found"}"#, Currency::Eur, 200).unwrap_err();
        assert!(matches!(err, UpstreamError::NotAnArray));

        let err = parse_ticker_body("<html>rate limited</html>", Currency::Eur, 200).unwrap_err();
        assert!(matches!(err, UpstreamError::NotAnArray));
    }

    #[test]
    fn rejects_truncated_json() {
        let err = parse_ticker_body(r#"[{"name": "Bitcoin""#, Currency::Eur, 200).unwrap_err();
        assert!(matches!(err, UpstreamError::Json(_)));
    }
}
