use std::sync::Arc;
use std::time::Duration;

use httpmock::{Method::GET, MockServer};

use news_proxy::external::feed_provider::FeedProvider;
use news_proxy::external::google_news::GoogleNewsProvider;
use news_proxy::services::news_service::NewsService;

const RELIANCE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <generator>NFE/5.0</generator>
    <title>"RELIANCE" - Google News</title>
    <link>https://news.google.com/search?q=RELIANCE&amp;hl=en-US&amp;gl=US&amp;ceid=US:en</link>
    <language>en-US</language>
    <description>Google News</description>
    <item>
      <title>Reliance Industries Q3 profit beats estimates - Reuters</title>
      <link>https://news.google.com/rss/articles/CBMi1</link>
      <guid isPermaLink="false">CBMi1</guid>
      <pubDate>Thu, 16 Jan 2025 12:41:00 GMT</pubDate>
      <description>Reliance Industries Q3 profit beats estimates</description>
      <source url="https://www.reuters.com">Reuters</source>
    </item>
    <item>
      <title>Reliance Retail opens 500 new stores - The Economic Times</title>
      <link>https://news.google.com/rss/articles/CBMi2</link>
      <guid isPermaLink="false">CBMi2</guid>
      <pubDate>Wed, 15 Jan 2025 07:00:00 GMT</pubDate>
      <source url="https://economictimes.indiatimes.com">The Economic Times</source>
    </item>
    <item>
      <title>Reliance Jio tariff hike explained</title>
      <guid isPermaLink="false">CBMi3</guid>
    </item>
  </channel>
</rss>"#;

fn provider_for(server: &MockServer) -> GoogleNewsProvider {
    GoogleNewsProvider::new(server.url("/rss/search"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetches_and_parses_search_feed() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rss/search")
                .query_param("q", "RELIANCE")
                .query_param("hl", "en-US")
                .query_param("gl", "US")
                .query_param("ceid", "US:en");
            then.status(200)
                .header("content-type", "application/rss+xml; charset=utf-8")
                .body(RELIANCE_FEED);
        })
        .await;

    let entries = provider_for(&server).fetch_entries("RELIANCE").await.unwrap();

    mock.assert_async().await;
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries[0].title.as_deref(),
        Some("Reliance Industries Q3 profit beats estimates - Reuters")
    );
    assert_eq!(entries[1].source.as_deref(), Some("The Economic Times"));
    assert_eq!(entries[1].published.as_deref(), Some("Wed, 15 Jan 2025 07:00:00 GMT"));
    assert!(entries[2].link.is_none());
}

#[tokio::test]
async fn test_service_normalizes_feed_with_limit_and_defaults() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rss/search").query_param("q", "RELIANCE");
            then.status(200).body(RELIANCE_FEED);
        })
        .await;

    let service = NewsService::new(Arc::new(provider_for(&server)), 25);

    let all = service.fetch_headlines("RELIANCE", 25).await;
    assert_eq!(all.count, 3);
    assert_eq!(all.sources, vec!["Reuters", "The Economic Times", "Unknown"]);
    assert_eq!(all.dates[2], "Unknown");
    assert_eq!(all.links[2], "");
    assert!(all.error.is_none());

    let capped = service.fetch_headlines("RELIANCE", 2).await;
    assert_eq!(capped.count, 2);
    assert_eq!(capped.headlines.len(), 2);
    assert_eq!(
        capped.links,
        vec![
            "https://news.google.com/rss/articles/CBMi1",
            "https://news.google.com/rss/articles/CBMi2",
        ]
    );
}

#[tokio::test]
async fn test_multi_word_query_is_form_encoded() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/rss/search").query_param("q", "Tata Motors");
            then.status(200).body(RELIANCE_FEED);
        })
        .await;

    let entries = provider_for(&server).fetch_entries("Tata Motors").await.unwrap();

    mock.assert_async().await;
    assert_eq!(entries.len(), 3);
}

#[tokio::test]
async fn test_upstream_error_status_becomes_error_field() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rss/search");
            then.status(503).body("unavailable");
        })
        .await;

    let service = NewsService::new(Arc::new(provider_for(&server)), 25);
    let result = service.fetch_headlines("AAPL", 25).await;

    assert_eq!(result.count, 0);
    assert!(result.headlines.is_empty());
    assert_eq!(result.error.as_deref(), Some("feed returned HTTP 503"));
}

#[tokio::test]
async fn test_malformed_feed_becomes_error_field() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rss/search");
            then.status(200).body("<html><body>consent required</body></html>");
        })
        .await;

    let service = NewsService::new(Arc::new(provider_for(&server)), 25);
    let result = service.fetch_headlines("AAPL", 25).await;

    assert_eq!(result.count, 0);
    assert!(result
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("failed to parse feed")));
}

#[tokio::test]
async fn test_unreachable_upstream_becomes_error_field() {
    // Nothing listens on port 1
    let provider =
        GoogleNewsProvider::new("http://127.0.0.1:1/rss/search", Duration::from_secs(2)).unwrap();
    let service = NewsService::new(Arc::new(provider), 25);

    let result = service.fetch_headlines("AAPL", 25).await;

    assert_eq!(result.count, 0);
    assert!(result.sources.is_empty() && result.dates.is_empty() && result.links.is_empty());
    assert!(result
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("network error")));
}
