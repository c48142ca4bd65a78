//! Core traits for the wildlife workbench.
//!
//! These are the seams between the workflow services and the external
//! collaborators: the MySQL store (or its in-memory stand-in) and the
//! geocoding service.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::commands::{Command, DispatchOutcome};
use crate::error::Result;
use crate::models::Table;

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Read-only access to tabular query results.
#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Run a read-only query and return its columns and rows, uncached.
    async fn fetch_table(&self, sql: &str) -> Result<Table>;

    /// Cheap liveness check against the store.
    async fn ping(&self) -> Result<()>;
}

/// Executes validated commands as single units of work.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Commit the command, or roll back everything it did and return the error.
    async fn dispatch(&self, command: &Command) -> Result<DispatchOutcome>;
}

/// Access to `sp_GetPreserveDashboard`.
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Every data-bearing result set of the procedure, in order.
    async fn dashboard_result_sets(&self, preserve_id: &str) -> Result<Vec<Table>>;
}

/// The scalar functions the reports are built from.
#[async_trait]
pub trait ScalarFunctions: Send + Sync {
    /// `fn_GetProjectDurationDays(proj_id)`.
    async fn project_duration_days(&self, proj_id: &str) -> Result<Option<i64>>;

    /// `fn_GetSpeciesCountInPreserve(p_id)`.
    async fn species_count_in_preserve(&self, p_id: &str) -> Result<Option<i64>>;

    /// `fn_GetLastObservationDate(sp_id)`.
    async fn last_observation_date(&self, sp_id: &str) -> Result<Option<NaiveDate>>;
}

/// Everything the workflow layer needs from the data store.
pub trait WildlifeStore:
    TabularSource + CommandDispatcher + DashboardRepository + ScalarFunctions
{
}

impl<T> WildlifeStore for T where
    T: TabularSource + CommandDispatcher + DashboardRepository + ScalarFunctions
{
}

// =============================================================================
// GEOCODING
// =============================================================================

/// Free-text address lookup.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidate display addresses in the order the service ranked them.
    /// May contain duplicates.
    async fn search(&self, query: &str) -> Result<Vec<String>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
