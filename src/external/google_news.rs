use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::errors::FeedError;
use crate::external::feed_provider::{FeedEntry, FeedProvider};

/// Google News RSS search (`/rss/search?q=...`)
pub struct GoogleNewsProvider {
    client: reqwest::Client,
    search_url: String,
}

impl GoogleNewsProvider {
    pub fn new(search_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fingenius-news-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self {
            client,
            search_url: search_url.into(),
        })
    }

    /// Full feed URL for a query, pinned to the US English edition.
    pub fn feed_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&hl=en-US&gl=US&ceid=US:en",
            self.search_url,
            encode_query(query)
        )
    }
}

/// Form-encodes a query: spaces become `+`, reserved characters are escaped.
pub fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Parses an RSS 2.0 document into entries, preserving feed order.
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let channel = rss::Channel::read_from(body).map_err(|e| FeedError::Parse(e.to_string()))?;

    let entries = channel
        .items()
        .iter()
        .map(|item| FeedEntry {
            title: item.title().map(str::to_string),
            source: item
                .source()
                .and_then(|source| source.title())
                .map(str::to_string),
            published: item.pub_date().map(str::to_string),
            link: item.link().map(str::to_string),
        })
        .collect();

    Ok(entries)
}

#[async_trait]
impl FeedProvider for GoogleNewsProvider {
    async fn fetch_entries(&self, query: &str) -> Result<Vec<FeedEntry>, FeedError> {
        let url = self.feed_url(query);
        debug!("Requesting news feed: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("News feed request failed for '{}': {}", query, e);
            FeedError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("News feed returned {} for '{}'", status, query);
            return Err(FeedError::BadStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        parse_feed(&body)
    }
}
