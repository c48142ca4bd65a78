//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Errors a handler returns instead of a body.
///
/// Workflow failures travel as notices inside successful responses; only
/// these reach the client as error statuses.
#[derive(Debug)]
pub enum ApiError {
    /// The data store is unreachable.
    Unavailable(String),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<wildlife_core::Error> for ApiError {
    fn from(err: wildlife_core::Error) -> Self {
        match err {
            wildlife_core::Error::Unavailable(_) => ApiError::Unavailable(err.to_string()),
            wildlife_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            wildlife_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
