//! Liveness and database reachability.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Health check.
///
/// # Returns
/// - 200 OK when the database answers a ping
/// - 503 Service Unavailable otherwise
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.db.store.ping().await?;
    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database: "connected",
    }))
}
