pub mod handler;
pub mod path;

use axum::{routing::any, Router};

use handler::portfolio;
use path::Path;

use crate::server::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(Path::Portfolio.as_str(), any(portfolio))
}
