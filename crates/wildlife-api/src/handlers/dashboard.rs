//! Preserve dashboard handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use wildlife_core::{PreserveDashboard, RefOption, Reported};

use crate::{ApiError, AppState};

/// Preserves that can be opened on the dashboard.
pub async fn list_preserves(State(state): State<AppState>) -> Json<Reported<Vec<RefOption>>> {
    Json(state.dashboard.preserves().await)
}

/// Dashboard for one preserve.
///
/// # Returns
/// - 200 OK with the dashboard (absent when it could not be assembled) and
///   its notices
/// - 503 Service Unavailable when the database cannot be reached
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(preserve_id): Path<String>,
) -> Result<Json<Reported<Option<PreserveDashboard>>>, ApiError> {
    Ok(Json(state.dashboard.load(&preserve_id).await?))
}
