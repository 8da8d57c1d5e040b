use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::external::feed_provider::FeedEntry;

/// Feed entries fetched for one query, with the time they were fetched
#[derive(Debug, Clone)]
pub struct CachedFeed {
    pub fetched_at: DateTime<Utc>,
    pub entries: Arc<Vec<FeedEntry>>,
}

/// Short-lived per-query cache of upstream feed entries.
///
/// Holds raw entries rather than `NewsResult`s so requests with different
/// limits for the same query share one upstream fetch.
#[derive(Clone)]
pub struct FeedCache {
    cache: Arc<DashMap<String, CachedFeed>>,
    ttl: chrono::Duration,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
        }
    }

    /// Entries for `query` if cached and not yet expired
    pub fn get(&self, query: &str) -> Option<Arc<Vec<FeedEntry>>> {
        self.get_at(query, Utc::now())
    }

    fn get_at(&self, query: &str, now: DateTime<Utc>) -> Option<Arc<Vec<FeedEntry>>> {
        if let Some(entry) = self.cache.get(query) {
            let cached = entry.value().clone();
            if self.is_fresh(&cached, now) {
                return Some(cached.entries);
            }
            drop(entry); // release the read guard before removing
            self.cache.remove(query);
        }
        None
    }

    pub fn insert(&self, query: &str, entries: Arc<Vec<FeedEntry>>) {
        self.cache.insert(
            query.to_string(),
            CachedFeed {
                fetched_at: Utc::now(),
                entries,
            },
        );
    }

    /// Drop every expired query
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.cache.retain(|_, cached| self.is_fresh(cached, now));
    }

    /// A TTL too large to represent never expires
    fn is_fresh(&self, cached: &CachedFeed, now: DateTime<Utc>) -> bool {
        match cached.fetched_at.checked_add_signed(self.ttl) {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
