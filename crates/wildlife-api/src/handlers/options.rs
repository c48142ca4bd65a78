//! Option lists for the entry forms.

use axum::{extract::State, Json};
use wildlife_core::Reported;

use crate::services::{load_form_options, FormOptions};
use crate::AppState;

/// Species, preserve and plan options plus the observation types.
///
/// A list that failed to load is empty and comes with an error notice; the
/// `submit` flags tell the client which forms can be sent.
pub async fn get_options(State(state): State<AppState>) -> Json<Reported<FormOptions>> {
    Json(load_form_options(&state.db).await)
}
