//! SQL text for every statement the workbench issues.
//!
//! Read queries double as query-cache keys, so the same constant must be used
//! wherever the same data is wanted.

/// Species options (`SP_ID`, `SP_NAME`).
pub const SPECIES_OPTIONS: &str = "SELECT SP_ID, SP_NAME FROM species";

/// Preserve options (`P_ID`, `PNAME`).
pub const PRESERVE_OPTIONS: &str = "SELECT P_ID, PNAME FROM species_preserves";

/// Plan options (`PROJ_ID`, `PROJ_NAME`).
pub const PLAN_OPTIONS: &str = "SELECT PROJ_ID, PROJ_NAME FROM conservation_plan";

/// The alert log, newest first.
pub const ALERTS: &str = "SELECT * FROM Alerts ORDER BY Timestamp DESC";

pub const INSERT_SPECIES: &str =
    "INSERT INTO species (SP_ID, SP_NAME, CLASSIFICATION) VALUES (?, ?, ?)";

pub const INSERT_PRESERVE: &str =
    "INSERT INTO species_preserves (P_ID, PLOC, PNAME, PECOSYSTEM, SP_ID) VALUES (?, ?, ?, ?, ?)";

pub const INSERT_PLAN: &str = "INSERT INTO conservation_plan (PROJ_ID, PROJ_NAME, STRDATE, END_DATE, SP_ID) VALUES (?, ?, ?, ?, ?)";

pub const INSERT_ENVIRONMENTAL: &str = "INSERT INTO environmental_data (DATA_ID, WATER_COND, WEATHERCOND, SOIL_COMP, AIRQUAL, P_ID) VALUES (?, ?, ?, ?, ?, ?)";

/// `(obs_id, sp_id, date, type, location, p_id_or_null)`.
pub const CALL_ADD_OBSERVATION: &str = "CALL sp_AddNewObservation(?, ?, ?, ?, ?, ?)";

/// `(sp_id, proj_id, status)`; answers with a `message` row.
pub const CALL_ASSIGN_SPECIES: &str = "CALL sp_AssignSpeciesToPlan(?, ?, ?)";

/// `(preserve_id)`; answers with four result sets.
pub const CALL_PRESERVE_DASHBOARD: &str = "CALL sp_GetPreserveDashboard(?)";

pub const FN_PROJECT_DURATION: &str = "SELECT fn_GetProjectDurationDays(?)";
pub const FN_SPECIES_COUNT: &str = "SELECT fn_GetSpeciesCountInPreserve(?)";
pub const FN_LAST_OBSERVATION: &str = "SELECT fn_GetLastObservationDate(?)";

pub const PING: &str = "SELECT 1";

/// `SELECT * FROM <table>` for a browsable raw table.
pub fn select_all(table: wildlife_core::RawTable) -> String {
    format!("SELECT * FROM {}", table.table_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlife_core::RawTable;

    #[test]
    fn test_select_all_uses_table_name() {
        assert_eq!(
            select_all(RawTable::Preserves),
            "SELECT * FROM species_preserves"
        );
        assert_eq!(
            select_all(RawTable::ProtectedBy),
            "SELECT * FROM protected_by"
        );
    }

    #[test]
    fn test_placeholder_counts() {
        assert_eq!(CALL_ADD_OBSERVATION.matches('?').count(), 6);
        assert_eq!(INSERT_ENVIRONMENTAL.matches('?').count(), 6);
        assert_eq!(INSERT_PRESERVE.matches('?').count(), 5);
    }
}
