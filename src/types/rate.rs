use serde::{Deserialize, Serialize};

use super::currency::Currency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRate {
    pub name: String,
    pub symbol: String,
    pub price_usd: Option<f64>,
    /// Price in the currency of the snapshot holding this rate.
    pub price: Option<f64>,
}

/// Every rate fetched by one refresh, denominated in `currency`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub currency: Currency,
    pub assets: Vec<AssetRate>,
}

impl RateSnapshot {
    pub fn new(currency: Currency, assets: Vec<AssetRate>) -> Self {
        RateSnapshot { currency, assets }
    }

    /// First asset whose symbol matches, ignoring ASCII case.
    pub fn find(&self, symbol: &str) -> Option<&AssetRate> {
        self.assets
            .iter()
            .find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn price_of(&self, symbol: &str) -> Option<f64> {
        self.find(symbol).and_then(|asset| asset.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlBuilderEntry {
    pub name: String,
    pub symbol: String,
}

impl From<&AssetRate> for UrlBuilderEntry {
    fn from(asset: &AssetRate) -> Self {
        UrlBuilderEntry {
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
        }
    }
}
