//! Outcome reporter: turns dispatch results into user-facing notices.

use serde::Serialize;
use wildlife_core::{Command, DispatchOutcome, Error, Notice};

pub const MSG_AIR_QUALITY_ALERT: &str =
    "Trigger Fired! A critical air quality alert was generated.";
pub const MSG_WATER_CONDITION_ALERT: &str =
    "Trigger Fired! A critical water condition alert was generated.";

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Committed.
    Saved,
    /// Refused by form validation; nothing was sent to the database.
    Invalid,
    /// Refused by a key, trigger or check constraint; rolled back.
    Conflict,
    /// The database could not be reached.
    Unavailable,
    /// Any other failure; rolled back.
    Failed,
}

impl SubmissionStatus {
    /// Status for a failed dispatch.
    pub fn of_error(err: &Error) -> Self {
        match err {
            Error::InvalidInput(_) => SubmissionStatus::Invalid,
            Error::DuplicateKey(_) | Error::Rejected(_) => SubmissionStatus::Conflict,
            Error::Unavailable(_) => SubmissionStatus::Unavailable,
            _ => SubmissionStatus::Failed,
        }
    }
}

/// The server's own text for a database error.
pub fn database_message(err: &Error) -> String {
    match err {
        Error::DuplicateKey(msg) | Error::Rejected(msg) => msg.clone(),
        Error::Database(sqlx::Error::Database(db)) => db.message().to_string(),
        other => other.to_string(),
    }
}

/// Notices for a committed command.
pub fn success_notices(command: &Command, outcome: &DispatchOutcome) -> Vec<Notice> {
    let mut notices = match command {
        Command::Species(s) => vec![Notice::success(format!(
            "Successfully added species '{}'!",
            s.sp_name
        ))],
        Command::Preserve(p) => vec![Notice::success(format!(
            "Successfully added new preserve '{}'!",
            p.pname
        ))],
        Command::Observation(o) => vec![Notice::success(format!(
            "Successfully added observation '{}'!",
            o.observation_id
        ))],
        Command::Plan(p) => vec![Notice::success(format!(
            "Successfully added project '{}'!",
            p.proj_name
        ))],
        Command::Environmental(e) => {
            let mut notices = vec![Notice::success(format!(
                "Successfully added environmental data '{}'!",
                e.data_id
            ))];
            if e.expects_air_quality_alert() {
                notices.push(Notice::info(MSG_AIR_QUALITY_ALERT));
            }
            if e.expects_water_condition_alert() {
                notices.push(Notice::info(MSG_WATER_CONDITION_ALERT));
            }
            notices
        }
        Command::Assignment(_) => Vec::new(),
    };

    if let DispatchOutcome::Procedure { messages } = outcome {
        match command {
            Command::Assignment(a) if messages.is_empty() => notices.push(Notice::success(
                format!("Species '{}' assigned to plan '{}'.", a.sp_id, a.proj_id),
            )),
            Command::Assignment(_) => {
                notices.extend(messages.iter().map(|m| Notice::success(m.as_str())))
            }
            _ => notices.extend(messages.iter().map(|m| Notice::info(m.as_str()))),
        }
    }
    notices
}

/// The notice for a command that failed validation or dispatch.
pub fn failure_notice(command: Option<&Command>, err: &Error) -> Notice {
    match err {
        Error::InvalidInput(msg) => Notice::warning(msg.as_str()),
        Error::DuplicateKey(_) => match command {
            Some(command) => Notice::error(duplicate_message(command, err)),
            None => Notice::error(format!("DATABASE ERROR: {}", database_message(err))),
        },
        Error::Rejected(_) | Error::Database(_) => {
            Notice::error(format!("DATABASE ERROR: {}", database_message(err)))
        }
        other => Notice::error(format!("An error occurred: {}", other)),
    }
}

fn duplicate_message(command: &Command, err: &Error) -> String {
    match command {
        Command::Observation(o) => match o.new_species() {
            Some(species) => format!(
                "DATABASE ERROR: A species with ID '{}' OR an observation with ID '{}' already exists. No data was saved.",
                species.sp_id, o.observation_id
            ),
            None => format!(
                "DATABASE ERROR: An observation with ID '{}' already exists. No data was saved.",
                o.observation_id
            ),
        },
        Command::Preserve(p) => format!("Error: A preserve with ID '{}' already exists.", p.p_id),
        Command::Species(s) => format!(
            "DATABASE ERROR: A species with ID '{}' already exists. No data was saved.",
            s.sp_id
        ),
        Command::Plan(p) => format!(
            "DATABASE ERROR: A conservation plan with ID '{}' already exists. No data was saved.",
            p.proj_id
        ),
        Command::Environmental(e) => format!(
            "DATABASE ERROR: Environmental data with ID '{}' already exists. No data was saved.",
            e.data_id
        ),
        Command::Assignment(_) => format!("DATABASE ERROR: {}", database_message(err)),
    }
}
