use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Where and how verbosely the proxy logs, read from the environment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            loki_enabled: std::env::var("LOKI_ENABLED")
                .ok()
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(false),
            loki_url: std::env::var("LOKI_URL").ok(),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "fingenius-news-proxy".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        EnvFilter::try_new(&self.log_level)
            .map_err(|e| format!("RUST_LOG '{}' is not a valid filter: {}", self.log_level, e))?;
        Ok(())
    }

    /// Loki push URL, only when shipping is switched on
    pub fn loki_target(&self) -> Option<&str> {
        self.loki_url.as_deref().filter(|_| self.loki_enabled)
    }
}

/// Installs the global subscriber: console output always, plus a Loki layer
/// when the `loki` feature is built and `LOKI_ENABLED` is set. Must run inside
/// the tokio runtime because the Loki sender is spawned onto it.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level)?)
        .with(fmt::layer());

    #[cfg(feature = "loki")]
    let registry = registry.with(loki_layer(&config)?);

    registry.try_init()?;

    #[cfg(not(feature = "loki"))]
    {
        if config.loki_enabled {
            tracing::warn!("LOKI_ENABLED is set but the `loki` feature is not built in");
        }
    }

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        loki = config.loki_target().is_some(),
        "📊 Logging initialized ({})",
        config.log_level
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(
    config: &LoggingConfig,
) -> Result<Option<tracing_loki::Layer>, Box<dyn std::error::Error>> {
    let Some(loki_url) = config.loki_target() else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", config.service_name.as_str())?
        .label("environment", config.environment.as_str())?
        .build_url(url::Url::parse(loki_url)?)?;

    tokio::spawn(task);
    Ok(Some(layer))
}
