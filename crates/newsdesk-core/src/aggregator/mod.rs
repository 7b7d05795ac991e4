mod cache;
mod query;
mod service;

pub use cache::{CacheEntry, CacheStatus, FeedCache};
pub use query::{keyword_tokens, matches_all, query_items, DEFAULT_LIMIT, MAX_LIMIT};
pub use service::{NewsAggregator, NewsRequest};
