use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::errors::FeedError;
use crate::external::feed_provider::{FeedEntry, FeedProvider};
use crate::external::google_news::GoogleNewsProvider;
use crate::models::{NewsResult, TickerReport};
use crate::services::feed_cache::FeedCache;
use crate::services::rate_limiter::RateLimiter;

const UNKNOWN: &str = "Unknown";

/// Exchange suffixes stripped from tickers before searching
const EXCHANGE_SUFFIXES: [&str; 2] = [".NS", ".BO"];

/// Fetches and normalizes headlines for tickers
pub struct NewsService {
    provider: Arc<dyn FeedProvider>,
    cache: Option<FeedCache>,
    rate_limiter: Option<RateLimiter>,
    default_limit: usize,
    batch_concurrency: usize,
}

impl NewsService {
    pub fn new(provider: Arc<dyn FeedProvider>, default_limit: usize) -> Self {
        Self {
            provider,
            cache: None,
            rate_limiter: None,
            default_limit,
            batch_concurrency: 1,
        }
    }

    /// Google News backed service with the optional cache and rate limiter
    /// switched on according to `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, FeedError> {
        let provider = GoogleNewsProvider::new(config.feed_url.clone(), config.fetch_timeout)?;
        let mut service = Self::new(Arc::new(provider), config.max_news_items)
            .with_batch_concurrency(config.batch_concurrency);

        if let Some(ttl) = config.cache_ttl {
            info!("Feed cache enabled (ttl={}s)", ttl.as_secs());
            service = service.with_cache(FeedCache::new(ttl));
        }
        if let Some(per_minute) = config.rate_limit_per_minute {
            info!("Upstream rate limit enabled ({} req/min)", per_minute);
            service = service.with_rate_limiter(RateLimiter::new(
                config.batch_concurrency,
                per_minute,
            ));
        }

        Ok(service)
    }

    pub fn with_cache(mut self, cache: FeedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn cache(&self) -> Option<&FeedCache> {
        self.cache.as_ref()
    }

    /// Fetch up to `max_items` headlines for a free-text query.
    ///
    /// Never fails: upstream errors come back as an empty result whose
    /// `error` field describes what went wrong.
    pub async fn fetch_headlines(&self, query: &str, max_items: usize) -> NewsResult {
        info!("Fetching news for: {}", query);

        let outcome = self
            .entries_for(query)
            .await
            .and_then(|entries| build_news_result(&entries, max_items));

        match outcome {
            Ok(result) => {
                info!("Found {} news articles for {}", result.count, query);
                result
            }
            Err(e) => {
                error!("Error fetching news for {}: {}", query, e);
                NewsResult::failed(e.to_string())
            }
        }
    }

    pub async fn ticker_report(&self, ticker: String, max_items: usize) -> TickerReport {
        let company_name = company_name_for(&ticker);
        let news = self.fetch_headlines(&company_name, max_items).await;
        TickerReport::new(ticker, company_name, news)
    }

    /// Reports for every ticker, in input order.
    ///
    /// At most `batch_concurrency` tickers are in flight at once; a failing
    /// ticker only affects its own report.
    pub async fn batch_reports(&self, tickers: Vec<String>, max_items: usize) -> Vec<TickerReport> {
        stream::iter(tickers)
            .map(|ticker| self.ticker_report(ticker, max_items))
            .buffered(self.batch_concurrency)
            .collect()
            .await
    }

    async fn entries_for(&self, query: &str) -> Result<Arc<Vec<FeedEntry>>, FeedError> {
        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(query)) {
            debug!("Feed cache hit for {}", query);
            return Ok(cached);
        }

        let entries = {
            let _guard = match &self.rate_limiter {
                Some(limiter) => {
                    debug!(
                        "Waiting for upstream slot ({} free)",
                        limiter.available_permits()
                    );
                    Some(limiter.acquire().await?)
                }
                None => None,
            };
            Arc::new(self.provider.fetch_entries(query).await?)
        };

        if let Some(cache) = &self.cache {
            cache.insert(query, entries.clone());
        }
        Ok(entries)
    }
}

/// Search text for a ticker: every `.NS` and `.BO` is removed, wherever it
/// appears.
pub fn company_name_for(ticker: &str) -> String {
    EXCHANGE_SUFFIXES
        .iter()
        .fold(ticker.to_string(), |name, suffix| name.replace(suffix, ""))
}

/// Flattens the first `max_items` entries into parallel lists.
///
/// Missing source and date become `"Unknown"`, a missing link becomes `""`.
/// An entry without a title fails the whole result.
pub fn build_news_result(entries: &[FeedEntry], max_items: usize) -> Result<NewsResult, FeedError> {
    let mut result = NewsResult::with_capacity(max_items.min(entries.len()));

    for (idx, entry) in entries.iter().take(max_items).enumerate() {
        let title = entry.title.clone().ok_or(FeedError::MissingTitle(idx))?;
        result.push(
            title,
            entry.source.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            entry.published.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            entry.link.clone().unwrap_or_default(),
        );
    }

    Ok(result)
}
