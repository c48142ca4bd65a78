//! Core data models for the wildlife workbench.
//!
//! These types mirror rows of the external `wild_db` schema plus the
//! derived shapes the reports and dashboard return.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::BigDecimal;

use crate::defaults::{AIR_QUALITY_ALERT_ABOVE, LABEL_SEPARATOR, WATER_CONDITION_ALERT_BELOW};

// =============================================================================
// REFERENCE OPTIONS
// =============================================================================

/// An `{id, display name}` pair used to populate selection inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefOption {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl RefOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Presentation label, `"id - name"`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.id, LABEL_SEPARATOR, self.name)
    }

    /// Parse a presentation label back into its parts.
    ///
    /// Splits on the first separator only, so names that themselves contain
    /// `" - "` survive intact. A label without a separator is treated as a
    /// bare id with an empty name.
    pub fn parse_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        match label.split_once(LABEL_SEPARATOR) {
            Some((id, name)) if !id.trim().is_empty() => {
                Some(Self::new(id.trim(), name.trim()))
            }
            Some(_) => None,
            None => Some(Self::new(label, "")),
        }
    }
}

impl std::fmt::Display for RefOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// OBSERVATION TYPES
// =============================================================================

/// Method by which an observation was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "Camera Trap")]
    CameraTrap,
    #[serde(rename = "Drone Sighting")]
    DroneSighting,
    #[serde(rename = "Footprint Tracking")]
    FootprintTracking,
    #[serde(rename = "Dive Sighting")]
    DiveSighting,
    #[serde(rename = "Acoustic Monitoring")]
    AcousticMonitoring,
    #[serde(rename = "Physical Sighting")]
    PhysicalSighting,
    #[serde(rename = "Scat/Dropping Analysis")]
    ScatDroppingAnalysis,
    #[serde(rename = "Other")]
    Other,
}

impl ObservationType {
    /// Every observation type, in display order.
    pub const ALL: [ObservationType; 8] = [
        ObservationType::CameraTrap,
        ObservationType::DroneSighting,
        ObservationType::FootprintTracking,
        ObservationType::DiveSighting,
        ObservationType::AcousticMonitoring,
        ObservationType::PhysicalSighting,
        ObservationType::ScatDroppingAnalysis,
        ObservationType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationType::CameraTrap => "Camera Trap",
            ObservationType::DroneSighting => "Drone Sighting",
            ObservationType::FootprintTracking => "Footprint Tracking",
            ObservationType::DiveSighting => "Dive Sighting",
            ObservationType::AcousticMonitoring => "Acoustic Monitoring",
            ObservationType::PhysicalSighting => "Physical Sighting",
            ObservationType::ScatDroppingAnalysis => "Scat/Dropping Analysis",
            ObservationType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for ObservationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// A row of `species`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub sp_id: String,
    pub sp_name: String,
    pub classification: String,
}

/// A row of `species_preserves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preserve {
    pub p_id: String,
    pub pname: String,
    pub ploc: String,
    pub pecosystem: String,
    pub sp_id: String,
}

/// A row of `observations`, as handed to `sp_AddNewObservation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub obs_id: String,
    pub sp_id: String,
    pub obs_date: NaiveDate,
    pub obs_type: ObservationType,
    pub location: String,
    /// `None` for ad-hoc (geocoded) locations.
    pub p_id: Option<String>,
}

/// A row of `conservation_plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConservationPlan {
    pub proj_id: String,
    pub proj_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sp_id: String,
}

/// Link between a species and a plan, created by `sp_AssignSpeciesToPlan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAssignment {
    pub sp_id: String,
    pub proj_id: String,
    pub status: String,
}

/// A row of `environmental_data`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentalReading {
    pub data_id: String,
    pub p_id: String,
    pub water_condition: BigDecimal,
    pub weather: String,
    pub soil_composition: String,
    pub air_quality: BigDecimal,
}

impl EnvironmentalReading {
    /// Whether the alert trigger is expected to log an air quality alert.
    pub fn expects_air_quality_alert(&self) -> bool {
        self.air_quality > BigDecimal::from(AIR_QUALITY_ALERT_ABOVE)
    }

    /// Whether the alert trigger is expected to log a water condition alert.
    pub fn expects_water_condition_alert(&self) -> bool {
        BigDecimal::from_str(WATER_CONDITION_ALERT_BELOW)
            .map(|threshold| self.water_condition < threshold)
            .unwrap_or(false)
    }
}

/// A row of `Alerts`. Written only by the database trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: i64,
    pub timestamp: chrono::NaiveDateTime,
    pub message: String,
}

// =============================================================================
// TABULAR RESULTS
// =============================================================================

/// A generic tabular result: column names plus rows of JSON cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Self {
        Self { columns, rows }
    }

    /// A table with no columns and no rows ("no data").
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column, compared case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Cell at `row` in the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&JsonValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Cell rendered as text; numbers and other scalars are stringified.
    pub fn text(&self, row: usize, column: &str) -> Option<String> {
        match self.value(row, column)? {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Every value of the named column, in row order.
    pub fn column_texts(&self, column: &str) -> Vec<Option<String>> {
        (0..self.rows.len()).map(|r| self.text(r, column)).collect()
    }
}

// =============================================================================
// REPORTS
// =============================================================================

/// Plan row augmented with `fn_GetProjectDurationDays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDuration {
    pub proj_id: String,
    pub proj_name: String,
    pub duration_days: Option<i64>,
}

/// Preserve row augmented with `fn_GetSpeciesCountInPreserve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreserveSpeciesCount {
    pub p_id: String,
    pub pname: String,
    pub species_count: Option<i64>,
}

/// Species row augmented with `fn_GetLastObservationDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesLastObservation {
    pub sp_id: String,
    pub sp_name: String,
    pub last_observation: Option<NaiveDate>,
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// Most observed species at a preserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSpecies {
    pub name: String,
    pub observation_count: i64,
}

/// The four result sets of `sp_GetPreserveDashboard`, named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreserveDashboard {
    pub preserve_id: String,
    pub details: Table,
    pub species_observed: Table,
    pub environmental: Table,
    pub top_species: Table,
    pub most_observed: Option<TopSpecies>,
}

// =============================================================================
// RAW TABLES
// =============================================================================

/// Tables browsable from the raw data tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawTable {
    Species,
    Observations,
    Preserves,
    ConservationPlans,
    ProtectedBy,
    EnvironmentalData,
}

impl RawTable {
    pub const ALL: [RawTable; 6] = [
        RawTable::Species,
        RawTable::Observations,
        RawTable::Preserves,
        RawTable::ConservationPlans,
        RawTable::ProtectedBy,
        RawTable::EnvironmentalData,
    ];

    /// Name of the backing database table.
    pub fn table_name(&self) -> &'static str {
        match self {
            RawTable::Species => "species",
            RawTable::Observations => "observations",
            RawTable::Preserves => "species_preserves",
            RawTable::ConservationPlans => "conservation_plan",
            RawTable::ProtectedBy => "protected_by",
            RawTable::EnvironmentalData => "environmental_data",
        }
    }

    /// Accepts either the route slug (`conservation_plans`) or the
    /// database table name (`conservation_plan`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|t| {
            t.table_name() == s
                || serde_json::to_value(t)
                    .ok()
                    .and_then(|v| v.as_str().map(|v| v == s))
                    .unwrap_or(false)
        })
    }
}
