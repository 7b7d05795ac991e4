use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use newsdesk_core::aggregator::CacheStatus;
use newsdesk_core::feed::{parse_source_keys, FeedItem, Source};
use newsdesk_core::NewsRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of `/api/news`
#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    /// Comma-separated source keys
    pub sources: Option<String>,
    /// Keywords, all of which must match
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl NewsParams {
    pub(crate) fn into_request(self) -> Result<NewsRequest, ApiError> {
        Ok(NewsRequest {
            sources: self.sources.as_deref().map(parse_source_keys).unwrap_or_default(),
            limit: parse_limit(self.limit.as_deref())?,
            keywords: self.q,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<Source>,
}

#[derive(Debug, Serialize)]
pub struct CacheResponse {
    pub sources: Vec<CacheStatus>,
}

/// Parse the `limit` parameter; missing or blank means the default
pub fn parse_limit(raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<i64>().map(Some).map_err(|_| ApiError::InvalidParameter {
            name: "limit",
            value: value.to_string(),
        }),
    }
}

pub async fn get_news(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<NewsResponse>, ApiError> {
    let request = params.into_request()?;
    tracing::debug!(
        "News request: sources={:?} q={:?} limit={:?}",
        request.sources,
        request.keywords,
        request.limit
    );

    let items = state.aggregator.news(&request).await;
    Ok(Json(NewsResponse { items }))
}

pub async fn get_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    Json(SourcesResponse {
        sources: state.aggregator.registry().all().to_vec(),
    })
}

pub async fn get_cache(State(state): State<AppState>) -> Json<CacheResponse> {
    Json(CacheResponse {
        sources: state.aggregator.cache_status().await,
    })
}
