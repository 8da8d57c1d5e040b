use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{BatchNewsRequest, BatchNewsResponse, NewsQueryParams, TickerReport};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/batch", post(get_batch_news).get(get_batch_ticker_news))
        .route("/:ticker", get(get_news))
}

/// GET /api/news/:ticker
///
/// Query parameters:
/// - `limit`: Maximum number of headlines (default: 25). Non-numeric values
///   fall back to the default.
async fn get_news(
    Path(ticker): Path<String>,
    Query(params): Query<NewsQueryParams>,
    State(state): State<AppState>,
) -> Json<TickerReport> {
    let limit = query_limit(&params, state.news_service.default_limit());

    info!("GET /api/news/{} - Fetching ticker news (limit={})", ticker, limit);

    Json(state.news_service.ticker_report(ticker, limit).await)
}

/// GET /api/news/batch
///
/// The static `/batch` route shadows `/:ticker`, so a GET here is served as
/// news for the ticker "batch".
async fn get_batch_ticker_news(
    Query(params): Query<NewsQueryParams>,
    State(state): State<AppState>,
) -> Json<TickerReport> {
    let limit = query_limit(&params, state.news_service.default_limit());

    info!("GET /api/news/batch - Fetching ticker news (limit={})", limit);

    Json(state.news_service.ticker_report("batch".to_string(), limit).await)
}

/// POST /api/news/batch
///
/// Body: `{"tickers": [...], "limit": 25}`. A missing `tickers` list is
/// treated as empty; a malformed body is rejected with 400.
async fn get_batch_news(
    State(state): State<AppState>,
    body: Result<Json<BatchNewsRequest>, JsonRejection>,
) -> Result<Json<BatchNewsResponse>, AppError> {
    let Json(request) = body.map_err(|e| {
        warn!("POST /api/news/batch - Rejected body: {}", e.body_text());
        AppError::from(e)
    })?;

    let limit = request
        .limit
        .map(clamp_limit)
        .unwrap_or_else(|| state.news_service.default_limit());
    let total_tickers = request.tickers.len();

    info!(
        "POST /api/news/batch - Fetching news for {} tickers (limit={})",
        total_tickers, limit
    );

    let results = state
        .news_service
        .batch_reports(request.tickers, limit)
        .await;

    Ok(Json(BatchNewsResponse {
        results,
        total_tickers,
    }))
}

fn query_limit(params: &NewsQueryParams, default_limit: usize) -> usize {
    match params.limit.as_deref() {
        Some(raw) => parse_limit(raw).unwrap_or_else(|| {
            warn!("Ignoring non-numeric limit '{}', using {}", raw, default_limit);
            default_limit
        }),
        None => default_limit,
    }
}

fn parse_limit(raw: &str) -> Option<usize> {
    raw.trim().parse::<i64>().ok().map(clamp_limit)
}

/// Negative limits select nothing
fn clamp_limit(limit: i64) -> usize {
    usize::try_from(limit.max(0)).unwrap_or(usize::MAX)
}
