//! Location search handlers.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use wildlife_core::Reported;

use crate::session::SessionId;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationSearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct LocationCandidates {
    pub candidates: Vec<String>,
}

/// Geocode free text and keep the matches as the session's candidates.
pub async fn search_locations(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(body): Json<LocationSearchRequest>,
) -> Json<Reported<LocationCandidates>> {
    let result = state.locations.search(session.as_str(), &body.query).await;
    Json(result.map(|candidates| LocationCandidates { candidates }))
}

/// Candidates currently held for the session.
pub async fn get_locations(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Json<LocationCandidates> {
    Json(LocationCandidates {
        candidates: state.locations.candidates(session.as_str()).await,
    })
}
