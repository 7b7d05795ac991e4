use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the HTTP API
#[derive(Debug, Error)]
pub enum ApiError {
    /// A query parameter could not be interpreted
    #[error("Invalid value for '{name}': {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// No route matches the request path
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Body of every error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ApiError::InvalidParameter { name, value } => (
                StatusCode::BAD_REQUEST,
                format!("Invalid query parameter '{}'", name),
                Some(format!("'{}' is not an integer", value)),
            ),
            ApiError::NotFound(path) => (StatusCode::NOT_FOUND, format!("No route for {}", path), None),
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}
