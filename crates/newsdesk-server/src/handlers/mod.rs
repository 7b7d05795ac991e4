mod feed;
mod index;
mod news;

use axum::http::Uri;

use crate::error::ApiError;

pub use feed::{get_json_feed, JsonFeed, JsonFeedAuthor, JsonFeedItem};
pub use index::{escape_html, index, render_index};
pub use news::{get_cache, get_news, get_sources, parse_limit, NewsParams};

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
