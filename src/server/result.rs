use std::sync::Arc;

use axum::{
    http::{Response, StatusCode},
    response::{Html, IntoResponse},
};

use super::view;
use crate::types::{Currency, UrlBuilderEntry};

pub type AppResult<T> = Result<T, AppError>;
pub type AppHtmlResult = AppResult<Html<String>>;

pub enum AppError {
    UnsupportedCurrency {
        input: String,
        url_builder: Arc<Vec<UrlBuilderEntry>>,
    },
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response<axum::body::Body> {
        let (status, page) = match self {
            AppError::UnsupportedCurrency { input, url_builder } => (
                StatusCode::BAD_REQUEST,
                view::error_view(&input, &Currency::ALL, &url_builder),
            ),
            AppError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal Server Error: {}", view::escape(&msg)),
            ),
        };

        (status, Html(page)).into_response()
    }
}
