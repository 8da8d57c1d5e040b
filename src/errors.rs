use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Failures raised while talking to the upstream news feed.
///
/// These never reach the client as an HTTP error: the news service folds them
/// into the `error` field of an empty `NewsResult`.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),

    #[error("feed returned HTTP {0}")]
    BadStatus(u16),

    #[error("failed to parse feed: {0}")]
    Parse(String),

    #[error("feed entry {0} has no title")]
    MissingTitle(usize),

    #[error("rate limiter unavailable")]
    RateLimiter,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(value: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(value.body_text())
    }
}
