use async_trait::async_trait;

use crate::errors::FeedError;

/// One item of an upstream news feed, with optional fields left unresolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    /// Name of the publisher the entry was syndicated from
    pub source: Option<String>,
    /// Publish date exactly as written in the feed
    pub published: Option<String>,
    pub link: Option<String>,
}

#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch the feed for a free-text search query, entries in feed order.
    async fn fetch_entries(&self, query: &str) -> Result<Vec<FeedEntry>, FeedError>;
}
