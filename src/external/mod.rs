pub mod feed_provider;
pub mod google_news;
