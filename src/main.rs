use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use news_proxy::app;
use news_proxy::config::{AppConfig, SERVICE_NAME};
use news_proxy::logging::{init_logging, LoggingConfig};
use news_proxy::services::news_service::NewsService;
use news_proxy::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env();
    config.validate()?;

    let news_service = Arc::new(NewsService::from_config(&config)?);

    if let Some(cache) = news_service.cache().cloned() {
        let ttl = config.cache_ttl.unwrap_or(Duration::from_secs(60));
        tokio::spawn(async move {
            let mut sweep = tokio::time::interval(ttl);
            loop {
                sweep.tick().await;
                cache.cleanup_expired();
                tracing::debug!("Feed cache holds {} queries", cache.len());
            }
        });
    }

    let state = AppState { news_service };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("🚀 {} running at http://{}/", SERVICE_NAME, addr);
    tracing::info!("  GET  /api/news/<ticker>  - news for a single ticker");
    tracing::info!("  POST /api/news/batch     - news for multiple tickers");
    tracing::info!("  GET  /health             - health check");

    axum::serve(listener, app).await?;

    Ok(())
}
