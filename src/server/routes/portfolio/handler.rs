use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Query, State},
    response::Html,
};
use tracing::{info, instrument, warn};

use crate::{
    portfolio::value_portfolio,
    server::{
        result::{AppError, AppHtmlResult},
        state::AppState,
        view,
    },
    types::Currency,
};

/// Query pairs in order. A bare `?EUR` has its text in the key, `?c=EUR` in
/// the value; either form is accepted.
fn query_values(params: Vec<(String, String)>) -> Vec<String> {
    params
        .into_iter()
        .map(|(key, value)| if value.is_empty() { key } else { value })
        .filter(|value| !value.is_empty())
        .collect()
}

/// `/?CURRENCY&SYMBOL*AMOUNT*PRICE&...`
///
/// Without parameters the instructions page is rendered. Otherwise the first
/// value selects the currency, rates are refreshed for it, and the remaining
/// values are valued as holdings.
#[instrument(skip(state, connect_info))]
pub async fn portfolio(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppHtmlResult {
    let values = query_values(params);
    let Some((first, holdings)) = values.split_first() else {
        let url_builder = state.cache.url_builder_data().await;
        return Ok(Html(view::help_view(&Currency::ALL, &url_builder)));
    };

    let remote = connect_info
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| String::from("unknown"));
    info!("New REQUEST: {:?} BY: {}", values, remote);

    let currency: Currency = match first.parse() {
        Ok(currency) => currency,
        Err(e) => {
            warn!("{}", e);
            return Err(AppError::UnsupportedCurrency {
                input: first.clone(),
                url_builder: state.cache.url_builder_data().await,
            });
        }
    };

    let previous = state.selected.set(currency).await;
    if previous != currency {
        info!("Selected currency changed from {} to {}", previous, currency);
    }
    if let Err(e) = state.cache.refresh(currency).await {
        warn!("Serving cached rates for {}: {}", currency, e);
    }

    let portfolio = value_portfolio(&state.cache, currency, holdings).await;
    let last_updated = state.cache.last_updated().await;
    Ok(Html(view::results_view(&portfolio, last_updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bare_keys_and_named_values_are_both_read() {
        assert_eq!(
            query_values(pairs(&[("EUR", ""), ("BTC*2*1000", "")])),
            vec!["EUR", "BTC*2*1000"]
        );
        assert_eq!(
            query_values(pairs(&[("c", "eur"), ("1", "BTC*2*1000")])),
            vec!["eur", "BTC*2*1000"]
        );
    }

    #[test]
    fn empty_pairs_are_dropped() {
        assert!(query_values(pairs(&[("", "")])).is_empty());
    }
}
