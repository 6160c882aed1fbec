use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::{RateCache, SelectedCurrency};

/// Refreshes the selected currency's rates immediately and then once per
/// `period`, until `cancel` fires. Failed refreshes keep the stale snapshot
/// and wait for the next tick. A hung upstream is cut off by the cache's
/// fetch timeout, which must stay below `period` for ticks to keep their pace.
#[instrument(skip(cache, selected, cancel))]
pub async fn main(
    cache: RateCache,
    selected: SelectedCurrency,
    period: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    info!("Starting periodic rate refresh");
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let currency = selected.get().await;
                if let Err(e) = cache.refresh(currency).await {
                    warn!("Periodic refresh for {} failed, keeping previous rates: {}", currency, e);
                }
            }
        }
    }

    info!("Periodic rate refresh stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use super::*;
    use crate::{cache::tests::FakeTicker, types::Currency};

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_at_startup_and_every_period() {
        let ticker = Arc::new(FakeTicker::with_prices(&[("BTC", 1200.0)]));
        let cache = RateCache::new(ticker.clone());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(main(
            cache.clone(),
            SelectedCurrency::default(),
            Duration::from_secs(55),
            cancel.clone(),
        ));

        settle().await;
        assert_eq!(ticker.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.lookup("BTC", Currency::Eur).await, Some(1200.0));

        tokio::time::advance(Duration::from_secs(54)).await;
        settle().await;
        assert_eq!(ticker.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(ticker.calls.load(Ordering::SeqCst), 2);

        cancel.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn follows_the_selected_currency() {
        let ticker = Arc::new(FakeTicker::with_prices(&[("BTC", 1200.0)]));
        let selected = SelectedCurrency::default();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(main(
            RateCache::new(ticker.clone()),
            selected.clone(),
            Duration::from_secs(55),
            cancel.clone(),
        ));

        settle().await;
        selected.set(Currency::Chf).await;
        tokio::time::advance(Duration::from_secs(55)).await;
        settle().await;

        assert_eq!(
            *ticker.requested.lock().unwrap(),
            vec![Currency::Eur, Currency::Chf]
        );

        cancel.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_running_after_upstream_failure() {
        let ticker = Arc::new(FakeTicker::with_prices(&[("BTC", 1200.0)]));
        ticker.failing.store(true, Ordering::SeqCst);
        let cache = RateCache::new(ticker.clone());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(main(
            cache.clone(),
            SelectedCurrency::default(),
            Duration::from_secs(55),
            cancel.clone(),
        ));

        settle().await;
        assert_eq!(cache.lookup("BTC", Currency::Eur).await, None);

        ticker.failing.store(false, Ordering::SeqCst);
        tokio::time::advance(Duration::from_secs(55)).await;
        settle().await;
        assert_eq!(cache.lookup("BTC", Currency::Eur).await, Some(1200.0));

        cancel.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn hung_upstream_does_not_stop_later_ticks() {
        let ticker = Arc::new(FakeTicker::with_prices(&[("BTC", 1200.0)]));
        ticker.stuck.store(true, Ordering::SeqCst);
        let cache = RateCache::new(ticker.clone()).with_fetch_timeout(Duration::from_secs(10));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(main(
            cache.clone(),
            SelectedCurrency::default(),
            Duration::from_secs(55),
            cancel.clone(),
        ));

        settle().await;
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(55)).await;
            settle().await;
        }
        assert!(ticker.calls.load(Ordering::SeqCst) >= 5);

        ticker.stuck.store(false, Ordering::SeqCst);
        tokio::time::advance(Duration::from_secs(55)).await;
        settle().await;
        assert_eq!(cache.lookup("BTC", Currency::Eur).await, Some(1200.0));

        cancel.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_refresher_stops_fetching() {
        let ticker = Arc::new(FakeTicker::with_prices(&[("BTC", 1200.0)]));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(main(
            RateCache::new(ticker.clone()),
            SelectedCurrency::default(),
            Duration::from_secs(55),
            cancel.clone(),
        ));

        settle().await;
        cancel.cancel();
        task.await.unwrap().unwrap();

        tokio::time::advance(Duration::from_secs(600)).await;
        settle().await;
        assert_eq!(ticker.calls.load(Ordering::SeqCst), 1);
    }
}
