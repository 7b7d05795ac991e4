use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use newsdesk_core::feed::FeedItem;

use super::news::NewsParams;
use crate::error::ApiError;
use crate::state::AppState;

const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1";
const FEED_TITLE: &str = "newsdesk";
const FEED_DESCRIPTION: &str = "Latest stories from the newsdesk sources";

/// A JSON Feed v1 document
#[derive(Debug, Serialize)]
pub struct JsonFeed {
    pub version: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub items: Vec<JsonFeedItem>,
}

#[derive(Debug, Serialize)]
pub struct JsonFeedItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub title: String,
    pub summary: String,
    /// Only set when the entry date could be parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    pub authors: Vec<JsonFeedAuthor>,
}

#[derive(Debug, Serialize)]
pub struct JsonFeedAuthor {
    pub name: String,
}

impl From<FeedItem> for JsonFeedItem {
    fn from(item: FeedItem) -> Self {
        let url = (!item.link.is_empty()).then(|| item.link.clone());
        let date_published = item.is_dated().then(|| item.published_display.clone());

        Self {
            id: url.clone().unwrap_or_else(|| item.title.clone()),
            url,
            title: item.title,
            summary: item.summary,
            date_published,
            authors: vec![JsonFeedAuthor { name: item.source_name }],
        }
    }
}

/// Republish the merged news list as a JSON Feed; takes the same parameters as `/api/news`
pub async fn get_json_feed(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<JsonFeed>, ApiError> {
    let request = params.into_request()?;
    let items = state.aggregator.news(&request).await;

    Ok(Json(JsonFeed {
        version: JSON_FEED_VERSION,
        title: FEED_TITLE,
        description: FEED_DESCRIPTION,
        items: items.into_iter().map(JsonFeedItem::from).collect(),
    }))
}
