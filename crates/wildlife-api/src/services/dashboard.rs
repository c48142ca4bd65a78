//! Preserve dashboard built from `sp_GetPreserveDashboard`.

use tracing::{debug, error};
use wildlife_core::defaults::DASHBOARD_RESULT_SETS;
use wildlife_core::{
    Error, Notice, PreserveDashboard, RefOption, Reported, Result, Table, TopSpecies,
};
use wildlife_db::rows::json_i64;
use wildlife_db::Database;

pub const MSG_NO_PRESERVES: &str = "No preserves found in the database.";
pub const MSG_INCOMPLETE: &str = "Could not fetch all dashboard components. (Expected 4 results)";
pub const MSG_NO_OBSERVATIONS: &str = "No observations recorded for this preserve yet.";

/// First row of the top-species set, if it has one.
pub fn most_observed(top_species: &Table) -> Option<TopSpecies> {
    let name = top_species.text(0, "SP_NAME")?;
    let observation_count = top_species
        .value(0, "ObservationCount")
        .and_then(json_i64)
        .unwrap_or(0);
    Some(TopSpecies {
        name,
        observation_count,
    })
}

/// Name the four ordered result sets. Returns `None` when fewer came back.
pub fn assemble(preserve_id: &str, mut sets: Vec<Table>) -> Option<PreserveDashboard> {
    if sets.len() < DASHBOARD_RESULT_SETS {
        return None;
    }
    sets.truncate(DASHBOARD_RESULT_SETS);
    let top_species = sets.pop()?;
    let environmental = sets.pop()?;
    let species_observed = sets.pop()?;
    let details = sets.pop()?;
    Some(PreserveDashboard {
        preserve_id: preserve_id.to_string(),
        most_observed: most_observed(&top_species),
        details,
        species_observed,
        environmental,
        top_species,
    })
}

#[derive(Clone)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Preserves to choose from; warns when there are none.
    pub async fn preserves(&self) -> Reported<Vec<RefOption>> {
        let mut options = self.db.reference.preserves().await;
        if options.value.is_empty() && !options.has_errors() {
            options.push(Notice::warning(MSG_NO_PRESERVES));
        }
        options
    }

    /// Load the dashboard for one preserve.
    ///
    /// Only a lost connection is returned as an error; every other failure
    /// becomes a notice next to an absent dashboard.
    pub async fn load(&self, preserve_id: &str) -> Result<Reported<Option<PreserveDashboard>>> {
        let sets = match self.db.store.dashboard_result_sets(preserve_id).await {
            Ok(sets) => sets,
            Err(e) if e.is_connectivity() => return Err(e),
            Err(e) => {
                error!(
                    subsystem = "api",
                    component = "dashboard",
                    preserve_id,
                    error = %e,
                    "Dashboard procedure failed"
                );
                return Ok(Reported::with_notice(None, load_error(&e)));
            }
        };

        debug!(
            subsystem = "api",
            component = "dashboard",
            preserve_id,
            result_sets = sets.len(),
            "Dashboard loaded"
        );

        Ok(match assemble(preserve_id, sets) {
            None => Reported::with_notice(None, Notice::warning(MSG_INCOMPLETE)),
            Some(dashboard) if dashboard.top_species.is_empty() => {
                Reported::with_notice(Some(dashboard), Notice::info(MSG_NO_OBSERVATIONS))
            }
            Some(dashboard) => Reported::clean(Some(dashboard)),
        })
    }
}

fn load_error(e: &Error) -> Notice {
    Notice::error(format!("An error occurred while loading dashboard: {}", e))
}
