use axum::{routing::get, Json, Router};
use tracing::info;

use crate::config::SERVICE_NAME;
use crate::models::HealthStatus;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

async fn health() -> Json<HealthStatus> {
    info!("GET /health - Health check");
    Json(HealthStatus {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
