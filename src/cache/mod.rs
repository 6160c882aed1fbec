pub mod refresher;

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::{
    constant::{
        defaults::FETCH_TIMEOUT_SECS,
        ticker::{LIMIT, URL_BUILDER_LIMIT},
    },
    ticker::{TickerSource, UpstreamError},
    types::{Currency, RateSnapshot, UrlBuilderEntry},
};

/// The currency every refresh and portfolio is denominated in, shared by all
/// requests and the periodic refresher.
#[derive(Clone, Default)]
pub struct SelectedCurrency(Arc<RwLock<Currency>>);

impl SelectedCurrency {
    pub fn new(currency: Currency) -> Self {
        SelectedCurrency(Arc::new(RwLock::new(currency)))
    }

    pub async fn get(&self) -> Currency {
        *self.0.read().await
    }

    /// Returns the previously selected currency.
    pub async fn set(&self, currency: Currency) -> Currency {
        std::mem::replace(&mut *self.0.write().await, currency)
    }
}

#[derive(Default)]
struct CacheInner {
    snapshots: HashMap<Currency, Arc<RateSnapshot>>,
    url_builder: Arc<Vec<UrlBuilderEntry>>,
    last_updated: Option<DateTime<Utc>>,
}

/// Latest ticker snapshot per currency.
///
/// A refresh swaps in a whole new snapshot; readers keep whatever `Arc` they
/// already hold, so a failed or in-flight refresh never exposes partial data.
#[derive(Clone)]
pub struct RateCache {
    source: Arc<dyn TickerSource>,
    fetch_timeout: Duration,
    inner: Arc<RwLock<CacheInner>>,
}

impl RateCache {
    pub fn new(source: Arc<dyn TickerSource>) -> Self {
        RateCache {
            source,
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            inner: Arc::new(RwLock::new(CacheInner::default())),
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Fetches the top assets priced in `currency` and replaces that currency's
    /// snapshot. A fetch that fails or outlives the fetch timeout leaves the
    /// previous snapshot in place; the caller decides how to log it.
    #[instrument(skip(self))]
    pub async fn refresh(&self, currency: Currency) -> Result<Arc<RateSnapshot>, UpstreamError> {
        info!("COIN UPDATE: started");
        let assets = tokio::time::timeout(self.fetch_timeout, self.source.fetch(currency, LIMIT))
            .await
            .map_err(|_| UpstreamError::Timeout(self.fetch_timeout))??;

        let url_builder: Vec<UrlBuilderEntry> = assets
            .iter()
            .take(URL_BUILDER_LIMIT)
            .map(UrlBuilderEntry::from)
            .collect();
        let snapshot = Arc::new(RateSnapshot::new(currency, assets));

        let mut inner = self.inner.write().await;
        inner.snapshots.insert(currency, snapshot.clone());
        inner.url_builder = Arc::new(url_builder);
        inner.last_updated = Some(Utc::now());
        drop(inner);

        info!("COIN UPDATE: done, {} assets in {}", snapshot.assets.len(), currency);
        Ok(snapshot)
    }

    /// Cached price of `symbol` in `currency`, if that currency has been
    /// fetched and the symbol is priced. Takes the read lock per call; use
    /// [`RateCache::snapshot`] to price several symbols against one snapshot.
    pub async fn lookup(&self, symbol: &str, currency: Currency) -> Option<f64> {
        self.snapshot(currency).await?.price_of(symbol)
    }

    pub async fn snapshot(&self, currency: Currency) -> Option<Arc<RateSnapshot>> {
        self.inner.read().await.snapshots.get(&currency).cloned()
    }

    /// Name and symbol of the top assets from the latest successful refresh.
    pub async fn url_builder_data(&self) -> Arc<Vec<UrlBuilderEntry>> {
        self.inner.read().await.url_builder.clone()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_updated
    }
}
