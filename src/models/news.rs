use serde::{Deserialize, Serialize};

/// Headline metadata extracted from one feed, kept as four parallel lists.
///
/// `headlines`, `sources`, `dates` and `links` always have length `count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsResult {
    pub headlines: Vec<String>,
    pub sources: Vec<String>,
    pub dates: Vec<String>,
    pub links: Vec<String>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NewsResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            headlines: Vec::with_capacity(capacity),
            sources: Vec::with_capacity(capacity),
            dates: Vec::with_capacity(capacity),
            links: Vec::with_capacity(capacity),
            count: 0,
            error: None,
        }
    }

    /// Empty result carrying the reason the fetch failed
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn push(&mut self, headline: String, source: String, date: String, link: String) {
        self.headlines.push(headline);
        self.sources.push(source);
        self.dates.push(date);
        self.links.push(link);
        self.count += 1;
    }
}

/// News for a single ticker as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerReport {
    pub ticker: String,
    pub company_name: String,
    pub news: NewsResult,
    pub success: bool,
}

impl TickerReport {
    pub fn new(ticker: String, company_name: String, news: NewsResult) -> Self {
        let success = news.count > 0;
        Self {
            ticker,
            company_name,
            news,
            success,
        }
    }
}

/// Query parameters for `GET /api/news/:ticker`.
///
/// `limit` is kept as raw text so that a non-numeric value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQueryParams {
    pub limit: Option<String>,
}

/// Body of `POST /api/news/batch`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchNewsRequest {
    #[serde(default)]
    pub tickers: Vec<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchNewsResponse {
    pub results: Vec<TickerReport>,
    pub total_tickers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}
