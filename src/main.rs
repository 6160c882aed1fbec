use std::sync::Arc;

use anyhow::Result;

use coin_portfolio::{
    cache::{refresher, RateCache, SelectedCurrency},
    config::Config,
    server::{self, state::AppState},
    ticker::CoinMarketCapSource,
};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
    let config = Config::from_env()?;
    let mut set = JoinSet::new();

    let source = Arc::new(CoinMarketCapSource::new(
        &config.ticker_url,
        config.fetch_timeout,
    )?);
    let cache = RateCache::new(source).with_fetch_timeout(config.fetch_timeout);
    let selected = SelectedCurrency::default();
    let cancel = CancellationToken::new();

    set.spawn(refresher::main(
        cache.clone(),
        selected.clone(),
        config.refresh_interval,
        cancel.clone(),
    ));
    set.spawn(server::main(config, AppState { cache, selected }));

    // Whichever task ends first takes the other down with it.
    while let Some(res) = set.join_next().await {
        match res {
            Ok(Ok(_)) => info!("Task completed successfully"),
            Ok(Err(e)) => warn!("Task failed: {:?}", e),
            Err(e) => warn!("Task panicked: {:?}", e),
        }
        cancel.cancel();
        set.abort_all();
    }
    warn!("Main end");
    Ok(())
}
