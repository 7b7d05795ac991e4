use axum::{routing::get, Router};

use crate::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/news", get(handlers::get_news))
        .route("/api/sources", get(handlers::get_sources))
        .route("/api/cache", get(handlers::get_cache))
        .route("/api/feed.json", get(handlers::get_json_feed))
        .fallback(handlers::not_found)
        .with_state(state)
}
