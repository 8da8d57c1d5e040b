use std::sync::Arc;

use crate::services::news_service::NewsService;

#[derive(Clone)]
pub struct AppState {
    pub news_service: Arc<NewsService>,
}
