use std::sync::Arc;

use newsdesk_core::NewsAggregator;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<NewsAggregator>,
}

impl AppState {
    pub fn new(aggregator: Arc<NewsAggregator>) -> Self {
        Self { aggregator }
    }
}
