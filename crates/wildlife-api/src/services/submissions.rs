//! Submission workflow: validate a form, dispatch the command, report.

use serde::Serialize;
use tracing::{info, warn};
use wildlife_core::{
    AssignmentForm, Command, EnvironmentalForm, Error, ObservationForm,
    PlanForm, PreserveForm, Reported, Result, SpeciesForm,
};
use wildlife_db::Database;

use crate::services::outcome::{failure_notice, success_notices, SubmissionStatus};
use crate::session::SessionStore;

/// Result body of every write endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    /// Command kind, once the form validated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

pub type Submission = Reported<SubmissionOutcome>;

#[derive(Clone)]
pub struct SubmissionService {
    db: Database,
    sessions: SessionStore,
}

impl SubmissionService {
    pub fn new(db: Database, sessions: SessionStore) -> Self {
        Self { db, sessions }
    }

    /// Observation against the session's location candidates. A committed
    /// observation discards them unless a newer search replaced them meanwhile.
    pub async fn observation(&self, session: &str, form: ObservationForm) -> Submission {
        let candidates = self.sessions.candidates(session).await;
        let submission = self.submit(form.into_command(&candidates)).await;
        if submission.value.status == SubmissionStatus::Saved {
            self.sessions.clear_candidates_if(session, &candidates).await;
        }
        submission
    }

    pub async fn species(&self, form: SpeciesForm) -> Submission {
        self.submit(form.into_command()).await
    }

    pub async fn preserve(&self, form: PreserveForm) -> Submission {
        self.submit(form.into_command()).await
    }

    pub async fn plan(&self, form: PlanForm) -> Submission {
        self.submit(form.into_command()).await
    }

    pub async fn assignment(&self, form: AssignmentForm) -> Submission {
        self.submit(form.into_command()).await
    }

    pub async fn environmental(&self, form: EnvironmentalForm) -> Submission {
        self.submit(form.into_command()).await
    }

    async fn submit(&self, built: Result<Command>) -> Submission {
        match built {
            Ok(command) => self.dispatch(command).await,
            Err(err) => Reported::with_notice(
                SubmissionOutcome {
                    status: SubmissionStatus::of_error(&err),
                    command: None,
                    entity_id: None,
                },
                failure_notice(None, &err),
            ),
        }
    }

    async fn dispatch(&self, command: Command) -> Submission {
        let result = self.db.store.dispatch(&command).await;
        let mut outcome = SubmissionOutcome {
            status: SubmissionStatus::Saved,
            command: Some(command.kind()),
            entity_id: Some(command.entity_id().to_string()),
        };

        match result {
            Ok(dispatched) => {
                // New rows must show up in option lists and raw tables at once.
                self.db.cache.invalidate_all().await;
                info!(
                    subsystem = "api",
                    component = "submissions",
                    command = command.kind(),
                    entity_id = command.entity_id(),
                    "Submission saved"
                );
                Reported {
                    value: outcome,
                    notices: success_notices(&command, &dispatched),
                }
            }
            Err(err) => {
                log_failure(&command, &err);
                outcome.status = SubmissionStatus::of_error(&err);
                Reported::with_notice(outcome, failure_notice(Some(&command), &err))
            }
        }
    }
}

fn log_failure(command: &Command, err: &Error) {
    warn!(
        subsystem = "api",
        component = "submissions",
        command = command.kind(),
        entity_id = command.entity_id(),
        error = %err,
        "Submission failed"
    );
}
