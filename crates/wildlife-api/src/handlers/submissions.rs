//! Write endpoints.
//!
//! Every submission answers with a [`Submission`]: its status plus the
//! notices to show. The HTTP status mirrors the submission status. A body
//! that does not even deserialize (a malformed date, an unknown mode) is
//! answered the same way, as an invalid submission with a warning.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::StatusCode,
    Extension, Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;
use wildlife_core::{
    AssignmentForm, EnvironmentalForm, Error, ObservationForm, PlanForm, PreserveForm, Reported,
    SpeciesForm,
};

use crate::services::outcome::failure_notice;
use crate::services::{Submission, SubmissionOutcome, SubmissionStatus};
use crate::session::SessionId;
use crate::AppState;

type SubmissionResponse = (StatusCode, Json<Submission>);

pub fn status_code(status: SubmissionStatus) -> StatusCode {
    match status {
        SubmissionStatus::Saved => StatusCode::CREATED,
        SubmissionStatus::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionStatus::Conflict => StatusCode::CONFLICT,
        SubmissionStatus::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        SubmissionStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(submission: Submission) -> SubmissionResponse {
    (status_code(submission.value.status), Json(submission))
}

/// Submission for a body that could not be read into the form.
pub fn unreadable_form(rejection: &JsonRejection) -> Submission {
    let err = Error::InvalidInput(format!("Invalid form data: {}", rejection.body_text()));
    Reported::with_notice(
        SubmissionOutcome {
            status: SubmissionStatus::Invalid,
            command: None,
            entity_id: None,
        },
        failure_notice(None, &err),
    )
}

/// JSON form body whose rejection is itself a [`Submission`].
pub struct FormJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = SubmissionResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(form)) => Ok(FormJson(form)),
            Err(rejection) => {
                warn!(
                    subsystem = "api",
                    component = "submissions",
                    error = %rejection.body_text(),
                    "Unreadable form body"
                );
                Err(respond(unreadable_form(&rejection)))
            }
        }
    }
}

pub async fn create_observation(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    FormJson(form): FormJson<ObservationForm>,
) -> SubmissionResponse {
    respond(state.submissions.observation(session.as_str(), form).await)
}

pub async fn create_species(
    State(state): State<AppState>,
    FormJson(form): FormJson<SpeciesForm>,
) -> SubmissionResponse {
    respond(state.submissions.species(form).await)
}

pub async fn create_preserve(
    State(state): State<AppState>,
    FormJson(form): FormJson<PreserveForm>,
) -> SubmissionResponse {
    respond(state.submissions.preserve(form).await)
}

/// Plans are sent as entered; the database refuses an end date before the start.
pub async fn create_plan(
    State(state): State<AppState>,
    FormJson(form): FormJson<PlanForm>,
) -> SubmissionResponse {
    respond(state.submissions.plan(form).await)
}

pub async fn create_assignment(
    State(state): State<AppState>,
    FormJson(form): FormJson<AssignmentForm>,
) -> SubmissionResponse {
    respond(state.submissions.assignment(form).await)
}

pub async fn create_environmental(
    State(state): State<AppState>,
    FormJson(form): FormJson<EnvironmentalForm>,
) -> SubmissionResponse {
    respond(state.submissions.environmental(form).await)
}
