mod news;

pub use news::{
    BatchNewsRequest, BatchNewsResponse, HealthStatus, NewsQueryParams, NewsResult, TickerReport,
};
