//! Report handlers.

use axum::{extract::State, Json};
use wildlife_core::{
    PreserveSpeciesCount, ProjectDuration, Reported, SpeciesLastObservation, Table,
};

use crate::AppState;

pub async fn project_durations(
    State(state): State<AppState>,
) -> Json<Reported<Vec<ProjectDuration>>> {
    Json(state.reports.project_durations().await)
}

pub async fn species_counts(
    State(state): State<AppState>,
) -> Json<Reported<Vec<PreserveSpeciesCount>>> {
    Json(state.reports.species_counts().await)
}

pub async fn last_observations(
    State(state): State<AppState>,
) -> Json<Reported<Vec<SpeciesLastObservation>>> {
    Json(state.reports.last_observations().await)
}

pub async fn alerts(State(state): State<AppState>) -> Json<Reported<Table>> {
    Json(state.reports.alerts().await)
}
