pub mod result;
pub mod routes;
pub mod state;
pub mod view;

use std::{net::SocketAddr, path::Path, time::Duration};

use anyhow::{Context, Result};
use axum::{
    error_handling::HandleErrorLayer,
    handler::HandlerWithoutStateExt,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    BoxError, Router,
};
use result::AppError;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::config::Config;

/// The portfolio page at `/`, static assets for every other path.
pub fn app(state: AppState, static_dir: &Path, request_timeout: Duration) -> Router {
    let assets = ServeDir::new(static_dir).not_found_service(handler_404.into_service());

    Router::new()
        .merge(routes::portfolio::router())
        .fallback_service(assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout),
        )
        .with_state(state)
}

pub async fn main(config: Config, state: AppState) -> Result<()> {
    let app = app(state, &config.static_dir, config.request_timeout);

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}

async fn handle_timeout_error(method: Method, uri: Uri, err: BoxError) -> AppError {
    error!("`{method} {uri}` failed with {err}");
    AppError::InternalError(format!("`{method} {uri}` failed with {err}"))
}
