pub mod feed_cache;
pub mod news_service;
pub mod rate_limiter;
