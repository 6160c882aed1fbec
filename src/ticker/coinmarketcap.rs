use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{parse_ticker_body, TickerSource, UpstreamError};
use crate::types::{AssetRate, Currency};

/// CoinMarketCap v1 style ticker: `GET {base}?convert=EUR&limit=200`.
pub struct CoinMarketCapSource {
    client: Client,
    base_url: String,
}

impl CoinMarketCapSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn url(&self, currency: Currency, limit: usize) -> String {
        format!("{}?convert={}&limit={}", self.base_url, currency, limit)
    }
}

#[async_trait]
impl TickerSource for CoinMarketCapSource {
    #[instrument(skip(self))]
    async fn fetch(
        &self,
        currency: Currency,
        limit: usize,
    ) -> Result<Vec<AssetRate>, UpstreamError> {
        let url = self.url(currency, limit);
        debug!("url: {}", url);

        let resp = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status().as_u16()));
        }
        let body = resp.text().await?;
        parse_ticker_body(&body, currency, limit)
    }
}
