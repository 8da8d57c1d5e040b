use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const SERVICE_NAME: &str = "FinGenius News Proxy";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_MAX_NEWS_ITEMS: usize = 25;
pub const DEFAULT_FEED_URL: &str = "https://news.google.com/rss/search";
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Process-wide settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub max_news_items: usize,
    pub feed_url: String,
    pub fetch_timeout: Duration,
    /// Number of tickers fetched at once by the batch endpoint (1 = sequential)
    pub batch_concurrency: usize,
    /// Per-query feed cache TTL; `None` disables caching
    pub cache_ttl: Option<Duration>,
    /// Upstream request budget; `None` disables rate limiting
    pub rate_limit_per_minute: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_news_items: DEFAULT_MAX_NEWS_ITEMS,
            feed_url: DEFAULT_FEED_URL.to_string(),
            fetch_timeout: Duration::from_secs(10),
            batch_concurrency: 1,
            cache_ttl: None,
            rate_limit_per_minute: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cache_ttl_secs: u64 = env_or("NEWS_CACHE_TTL_SECS", 0);
        let rate_limit: u32 = env_or("NEWS_RATE_LIMIT_PER_MINUTE", 0);

        Self {
            port: env_or("PORT", defaults.port),
            max_news_items: env_or("NEWS_MAX_ITEMS", defaults.max_news_items),
            feed_url: std::env::var("NEWS_FEED_URL").unwrap_or(defaults.feed_url),
            fetch_timeout: Duration::from_secs(env_or(
                "NEWS_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )),
            batch_concurrency: env_or("NEWS_BATCH_CONCURRENCY", defaults.batch_concurrency),
            cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
            rate_limit_per_minute: (rate_limit > 0).then_some(rate_limit),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.batch_concurrency == 0 {
            return Err("NEWS_BATCH_CONCURRENCY must be at least 1".to_string());
        }
        if let Some(ttl) = self.cache_ttl {
            if ttl > MAX_CACHE_TTL {
                return Err(format!(
                    "NEWS_CACHE_TTL_SECS must be at most {}, got {}",
                    MAX_CACHE_TTL.as_secs(),
                    ttl.as_secs()
                ));
            }
        }
        let url = url::Url::parse(&self.feed_url)
            .map_err(|e| format!("NEWS_FEED_URL is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "NEWS_FEED_URL must use http or https, got '{}'",
                url.scheme()
            ));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T: FromStr>(key: &str, raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!("Ignoring unparsable {}='{}', using default", key, raw);
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_contract() {
        let config = AppConfig::default();
        assert_eq!(config.port, 5001);
        assert_eq!(config.max_news_items, 25);
        assert_eq!(config.batch_concurrency, 1);
        assert!(config.cache_ttl.is_none());
        assert!(config.rate_limit_per_minute.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("PORT", "not-a-port", 5001u16), 5001);
        assert_eq!(parse_or("PORT", " 8080 ", 5001u16), 8080);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = AppConfig {
            batch_concurrency: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_cache_ttl() {
        let one_day = AppConfig {
            cache_ttl: Some(MAX_CACHE_TTL),
            ..AppConfig::default()
        };
        assert!(one_day.validate().is_ok());

        let too_long = AppConfig {
            cache_ttl: Some(MAX_CACHE_TTL + Duration::from_secs(1)),
            ..AppConfig::default()
        };
        assert!(too_long.validate().is_err());

        let absurd = AppConfig {
            cache_ttl: Some(Duration::from_secs(10_000_000_000_000)),
            ..AppConfig::default()
        };
        assert!(absurd.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_feed_url() {
        let config = AppConfig {
            feed_url: "ftp://news.example.com/rss".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
