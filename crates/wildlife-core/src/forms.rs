//! Raw form submissions and their validation into typed commands.
//!
//! Each form holds exactly what the client sent: every field is optional so
//! that a missing value is reported as a validation warning instead of a
//! deserialization failure. `build` performs presence and format checks and
//! returns [`Error::InvalidInput`] before anything reaches the database.
//! Typed fields (dates, modes) that fail to parse never get this far; the
//! HTTP layer answers them as invalid submissions too.
//!
//! Date order on plans and the alert thresholds on environmental readings are
//! deliberately not checked here; the database enforces them.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;

use crate::commands::{Command, ObservationCommand, ObservationLocation, SpeciesChoice};
use crate::defaults::ASSIGNMENT_STATUS;
use crate::error::{Error, Result};
use crate::models::{
    ConservationPlan, EnvironmentalReading, ObservationType, PlanAssignment, Preserve, RefOption,
    Species,
};

pub const MSG_OBSERVATION_FIELDS: &str = "Please fill out all observation fields.";
pub const MSG_NEW_SPECIES_FIELDS: &str = "Please fill out all New Species fields.";
pub const MSG_SPECIES_FIELDS: &str = "Please fill out all species fields.";
pub const MSG_SEARCH_FIRST: &str = "Please search for a location above.";
pub const MSG_UNKNOWN_LOCATION: &str = "Please select one of the locations found by the search.";
pub const MSG_PLAN_FIELDS: &str = "Please fill out all plan fields.";
pub const MSG_ASSIGNMENT_FIELDS: &str = "Please select a species and a plan.";
pub const MSG_ENVIRONMENTAL_FIELDS: &str = "Please fill out all environmental data fields.";
pub const MSG_PRESERVE_FIELDS: &str = "Please fill out all preserve fields.";

// =============================================================================
// FIELD HELPERS
// =============================================================================

/// A selected reference: either the structured pair or its `"id - name"` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Pair(RefOption),
    Label(String),
}

impl Selection {
    /// The selected option, or `None` when the selection is blank.
    pub fn resolve(&self) -> Option<RefOption> {
        match self {
            Selection::Pair(opt) if opt.id.trim().is_empty() => None,
            Selection::Pair(opt) => Some(RefOption::new(opt.id.trim(), opt.name.trim())),
            Selection::Label(label) => RefOption::parse_label(label),
        }
    }
}

impl From<RefOption> for Selection {
    fn from(opt: RefOption) -> Self {
        Selection::Pair(opt)
    }
}

/// A numeric input given either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    fn parse(&self, field: &str) -> Result<BigDecimal> {
        let raw = match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.trim().to_string(),
        };
        BigDecimal::from_str(&raw)
            .map_err(|_| Error::InvalidInput(format!("{} must be a number, got '{}'.", field, raw)))
    }
}

impl From<f64> for NumericInput {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(NumericInput::Number)
            .unwrap_or_else(|| NumericInput::Text(v.to_string()))
    }
}

impl From<i64> for NumericInput {
    fn from(v: i64) -> Self {
        NumericInput::Number(v.into())
    }
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn selected(value: &Option<Selection>) -> Option<RefOption> {
    value.as_ref().and_then(Selection::resolve)
}

fn missing(message: &str) -> Error {
    Error::InvalidInput(message.to_string())
}

// =============================================================================
// SPECIES
// =============================================================================

/// New species fields, used standalone or inline in an observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesForm {
    pub species_id: Option<String>,
    pub name: Option<String>,
    pub classification: Option<String>,
}

impl SpeciesForm {
    pub fn build(&self) -> Result<Species> {
        self.build_or(MSG_SPECIES_FIELDS)
    }

    fn build_or(&self, message: &str) -> Result<Species> {
        match (
            text(&self.species_id),
            text(&self.name),
            text(&self.classification),
        ) {
            (Some(sp_id), Some(sp_name), Some(classification)) => Ok(Species {
                sp_id,
                sp_name,
                classification,
            }),
            _ => Err(missing(message)),
        }
    }

    pub fn into_command(self) -> Result<Command> {
        self.build().map(Command::Species)
    }
}

// =============================================================================
// OBSERVATION
// =============================================================================

/// How the observation form picks its species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesMode {
    #[default]
    Existing,
    New,
}

/// How the observation form picks its location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    #[default]
    Preserve,
    Custom,
}

/// Raw observation submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationForm {
    pub observation_id: Option<String>,
    #[serde(default)]
    pub species_mode: SpeciesMode,
    pub species: Option<Selection>,
    pub new_species: Option<SpeciesForm>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub obs_type: Option<String>,
    #[serde(default)]
    pub location_mode: LocationMode,
    pub preserve: Option<Selection>,
    pub address: Option<String>,
}

impl ObservationForm {
    /// Validate against the location candidates held by the session.
    ///
    /// New-species fields are checked first, then the observation fields, so
    /// the warning names the section the user has to fix.
    pub fn build(&self, candidates: &[String]) -> Result<ObservationCommand> {
        let species = match self.species_mode {
            SpeciesMode::New => SpeciesChoice::New(
                self.new_species
                    .as_ref()
                    .ok_or_else(|| missing(MSG_NEW_SPECIES_FIELDS))?
                    .build_or(MSG_NEW_SPECIES_FIELDS)?,
            ),
            SpeciesMode::Existing => SpeciesChoice::Existing(
                selected(&self.species).ok_or_else(|| missing(MSG_OBSERVATION_FIELDS))?,
            ),
        };

        let location = match self.location_mode {
            LocationMode::Preserve => ObservationLocation::Preserve(
                selected(&self.preserve)
                    .filter(|p| !p.name.is_empty())
                    .ok_or_else(|| missing(MSG_OBSERVATION_FIELDS))?,
            ),
            LocationMode::Custom => {
                if candidates.is_empty() {
                    return Err(missing(MSG_SEARCH_FIRST));
                }
                let address = text(&self.address).ok_or_else(|| missing(MSG_OBSERVATION_FIELDS))?;
                if !candidates.iter().any(|c| c == &address) {
                    return Err(missing(MSG_UNKNOWN_LOCATION));
                }
                ObservationLocation::Geocoded(address)
            }
        };

        let observation_id =
            text(&self.observation_id).ok_or_else(|| missing(MSG_OBSERVATION_FIELDS))?;
        let date = self.date.ok_or_else(|| missing(MSG_OBSERVATION_FIELDS))?;
        let raw_type = text(&self.obs_type).ok_or_else(|| missing(MSG_OBSERVATION_FIELDS))?;
        let obs_type = ObservationType::parse(&raw_type).ok_or_else(|| {
            Error::InvalidInput(format!("Unknown observation type '{}'.", raw_type))
        })?;

        Ok(ObservationCommand {
            observation_id,
            species,
            date,
            obs_type,
            location,
        })
    }

    pub fn into_command(self, candidates: &[String]) -> Result<Command> {
        self.build(candidates).map(Command::Observation)
    }
}

// =============================================================================
// CONSERVATION PLAN
// =============================================================================

/// Raw conservation plan submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanForm {
    pub plan_id: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub species: Option<Selection>,
}

impl PlanForm {
    /// End-before-start is passed through untouched; the date trigger rejects it.
    pub fn build(&self) -> Result<ConservationPlan> {
        match (
            text(&self.plan_id),
            text(&self.name),
            self.start_date,
            self.end_date,
            selected(&self.species),
        ) {
            (Some(proj_id), Some(proj_name), Some(start_date), Some(end_date), Some(species)) => {
                Ok(ConservationPlan {
                    proj_id,
                    proj_name,
                    start_date,
                    end_date,
                    sp_id: species.id,
                })
            }
            _ => Err(missing(MSG_PLAN_FIELDS)),
        }
    }

    pub fn into_command(self) -> Result<Command> {
        self.build().map(Command::Plan)
    }
}

// =============================================================================
// ASSIGNMENT
// =============================================================================

/// Raw species-to-plan assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentForm {
    pub species: Option<Selection>,
    pub plan: Option<Selection>,
    pub status: Option<String>,
}

impl AssignmentForm {
    pub fn build(&self) -> Result<PlanAssignment> {
        let species = selected(&self.species).ok_or_else(|| missing(MSG_ASSIGNMENT_FIELDS))?;
        let plan = selected(&self.plan).ok_or_else(|| missing(MSG_ASSIGNMENT_FIELDS))?;
        Ok(PlanAssignment {
            sp_id: species.id,
            proj_id: plan.id,
            status: text(&self.status).unwrap_or_else(|| ASSIGNMENT_STATUS.to_string()),
        })
    }

    pub fn into_command(self) -> Result<Command> {
        self.build().map(Command::Assignment)
    }
}

// =============================================================================
// ENVIRONMENTAL DATA
// =============================================================================

/// Raw environmental reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalForm {
    pub data_id: Option<String>,
    pub preserve: Option<Selection>,
    pub water_condition: Option<NumericInput>,
    pub weather: Option<String>,
    pub soil_composition: Option<String>,
    pub air_quality: Option<NumericInput>,
}

impl EnvironmentalForm {
    /// Numbers are only checked for being numbers; ranges are the trigger's business.
    pub fn build(&self) -> Result<EnvironmentalReading> {
        let (Some(data_id), Some(preserve), Some(water), Some(weather), Some(soil), Some(air)) = (
            text(&self.data_id),
            selected(&self.preserve),
            self.water_condition.as_ref(),
            text(&self.weather),
            text(&self.soil_composition),
            self.air_quality.as_ref(),
        ) else {
            return Err(missing(MSG_ENVIRONMENTAL_FIELDS));
        };

        Ok(EnvironmentalReading {
            data_id,
            p_id: preserve.id,
            water_condition: water.parse("Water condition")?,
            weather,
            soil_composition: soil,
            air_quality: air.parse("Air quality")?,
        })
    }

    pub fn into_command(self) -> Result<Command> {
        self.build().map(Command::Environmental)
    }
}

// =============================================================================
// PRESERVE
// =============================================================================

/// Raw preserve submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreserveForm {
    pub preserve_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub ecosystem: Option<String>,
    pub species: Option<Selection>,
}

impl PreserveForm {
    pub fn build(&self) -> Result<Preserve> {
        match (
            text(&self.preserve_id),
            text(&self.name),
            text(&self.location),
            text(&self.ecosystem),
            selected(&self.species),
        ) {
            (Some(p_id), Some(pname), Some(ploc), Some(pecosystem), Some(species)) => {
                Ok(Preserve {
                    p_id,
                    pname,
                    ploc,
                    pecosystem,
                    sp_id: species.id,
                })
            }
            _ => Err(missing(MSG_PRESERVE_FIELDS)),
        }
    }

    pub fn into_command(self) -> Result<Command> {
        self.build().map(Command::Preserve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn observation_form() -> ObservationForm {
        ObservationForm {
            observation_id: Some("O06".to_string()),
            species: Some(Selection::Label("S01 - Lion".to_string())),
            date: Some(date(2025, 3, 14)),
            obs_type: Some("Camera Trap".to_string()),
            preserve: Some(RefOption::new("P01", "Serengeti Reserve").into()),
            ..Default::default()
        }
    }

    fn assert_invalid<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
        match result {
            Err(Error::InvalidInput(msg)) => assert_eq!(msg, expected),
            other => panic!("expected InvalidInput({expected}), got {other:?}"),
        }
    }

    #[test]
    fn test_selection_accepts_pair_or_label() {
        let pair: Selection = serde_json::from_value(json!({"id": "P01", "name": "Serengeti"})).unwrap();
        let label: Selection = serde_json::from_value(json!("P01 - Serengeti")).unwrap();
        assert_eq!(pair.resolve(), label.resolve());
        let bare: Selection = serde_json::from_value(json!({"id": "P01"})).unwrap();
        assert_eq!(bare.resolve(), Some(RefOption::new("P01", "")));
    }

    #[test]
    fn test_blank_selection_resolves_to_none() {
        assert_eq!(Selection::Label("  ".to_string()).resolve(), None);
        assert_eq!(Selection::Pair(RefOption::new(" ", "x")).resolve(), None);
    }

    #[test]
    fn test_observation_at_preserve() {
        let cmd = observation_form().build(&[]).unwrap();
        assert_eq!(cmd.species.species_id(), "S01");
        assert_eq!(cmd.location.preserve_id(), Some("P01"));
        assert_eq!(cmd.location.location_text(), "Serengeti Reserve");
        assert_eq!(cmd.obs_type, ObservationType::CameraTrap);
    }

    #[test]
    fn test_observation_missing_id_is_rejected() {
        let form = ObservationForm {
            observation_id: Some("   ".to_string()),
            ..observation_form()
        };
        assert_invalid(form.build(&[]), MSG_OBSERVATION_FIELDS);
    }

    #[test]
    fn test_observation_missing_date_is_rejected() {
        let form = ObservationForm {
            date: None,
            ..observation_form()
        };
        assert_invalid(form.build(&[]), MSG_OBSERVATION_FIELDS);
    }

    #[test]
    fn test_observation_unknown_type() {
        let form = ObservationForm {
            obs_type: Some("Telepathy".to_string()),
            ..observation_form()
        };
        assert_invalid(form.build(&[]), "Unknown observation type 'Telepathy'.");
    }

    #[test]
    fn test_observation_preserve_requires_name_for_location_text() {
        let form = ObservationForm {
            preserve: Some(Selection::Label("P01".to_string())),
            ..observation_form()
        };
        assert_invalid(form.build(&[]), MSG_OBSERVATION_FIELDS);
    }

    #[test]
    fn test_observation_custom_location_requires_search() {
        let form = ObservationForm {
            location_mode: LocationMode::Custom,
            address: Some("Nairobi, Kenya".to_string()),
            ..observation_form()
        };
        assert_invalid(form.build(&[]), MSG_SEARCH_FIRST);
    }

    #[test]
    fn test_observation_custom_location_must_be_a_candidate() {
        let form = ObservationForm {
            location_mode: LocationMode::Custom,
            address: Some("Somewhere else".to_string()),
            ..observation_form()
        };
        let candidates = vec!["Nairobi, Kenya".to_string()];
        assert_invalid(form.build(&candidates), MSG_UNKNOWN_LOCATION);
    }

    #[test]
    fn test_observation_custom_location_ignores_preserve() {
        let form = ObservationForm {
            location_mode: LocationMode::Custom,
            address: Some("Nairobi, Kenya".to_string()),
            ..observation_form()
        };
        let candidates = vec!["Nairobi, Kenya".to_string()];
        let cmd = form.build(&candidates).unwrap();
        assert_eq!(cmd.location.preserve_id(), None);
        assert_eq!(cmd.location.location_text(), "Nairobi, Kenya");
    }

    #[test]
    fn test_observation_new_species_requires_all_fields() {
        let form = ObservationForm {
            species_mode: SpeciesMode::New,
            new_species: Some(SpeciesForm {
                species_id: Some("S006".to_string()),
                name: Some("Siberian Tiger".to_string()),
                classification: None,
            }),
            ..observation_form()
        };
        assert_invalid(form.build(&[]), MSG_NEW_SPECIES_FIELDS);
    }

    #[test]
    fn test_observation_new_species_checked_before_observation_fields() {
        let form = ObservationForm {
            observation_id: None,
            species_mode: SpeciesMode::New,
            new_species: None,
            ..observation_form()
        };
        assert_invalid(form.build(&[]), MSG_NEW_SPECIES_FIELDS);
    }

    #[test]
    fn test_observation_new_species_ignores_selection() {
        let form = ObservationForm {
            species_mode: SpeciesMode::New,
            new_species: Some(SpeciesForm {
                species_id: Some("S006".to_string()),
                name: Some("Siberian Tiger".to_string()),
                classification: Some("Mammal".to_string()),
            }),
            ..observation_form()
        };
        let cmd = form.build(&[]).unwrap();
        assert_eq!(cmd.species.species_id(), "S006");
        assert!(cmd.new_species().is_some());
    }

    #[test]
    fn test_observation_form_from_json() {
        let form: ObservationForm = serde_json::from_value(json!({
            "observation_id": "O07",
            "species": "S02 - Elephant",
            "date": "2025-01-02",
            "type": "Drone Sighting",
            "location_mode": "custom",
            "address": "Amboseli, Kenya"
        }))
        .unwrap();
        let cmd = form.build(&["Amboseli, Kenya".to_string()]).unwrap();
        assert_eq!(cmd.obs_type, ObservationType::DroneSighting);
        assert_eq!(cmd.observation().p_id, None);
    }

    #[test]
    fn test_plan_end_before_start_is_not_checked_locally() {
        let form = PlanForm {
            plan_id: Some("CP05".to_string()),
            name: Some("Reverse Plan".to_string()),
            start_date: Some(date(2025, 6, 1)),
            end_date: Some(date(2024, 6, 1)),
            species: Some(Selection::Label("S01 - Lion".to_string())),
        };
        let plan = form.build().unwrap();
        assert!(plan.end_date < plan.start_date);
        assert_eq!(plan.sp_id, "S01");
    }

    #[test]
    fn test_plan_missing_species() {
        let form = PlanForm {
            plan_id: Some("CP05".to_string()),
            name: Some("Plan".to_string()),
            start_date: Some(date(2025, 6, 1)),
            end_date: Some(date(2026, 6, 1)),
            species: None,
        };
        assert_invalid(form.build(), MSG_PLAN_FIELDS);
    }

    #[test]
    fn test_assignment_default_status() {
        let form = AssignmentForm {
            species: Some(Selection::Label("S01 - Lion".to_string())),
            plan: Some(Selection::Label("CP01 - Lion Watch".to_string())),
            status: Some("  ".to_string()),
        };
        let assignment = form.build().unwrap();
        assert_eq!(assignment.status, ASSIGNMENT_STATUS);
        assert_eq!(assignment.proj_id, "CP01");
    }

    #[test]
    fn test_assignment_requires_plan() {
        let form = AssignmentForm {
            species: Some(Selection::Label("S01 - Lion".to_string())),
            plan: None,
            status: None,
        };
        assert_invalid(form.build(), MSG_ASSIGNMENT_FIELDS);
    }

    #[test]
    fn test_environmental_accepts_numbers_and_text() {
        let form: EnvironmentalForm = serde_json::from_value(json!({
            "data_id": "D05",
            "preserve": {"id": "P01", "name": "Serengeti"},
            "water_condition": "5.5",
            "weather": "Clear",
            "soil_composition": "Loamy",
            "air_quality": 200
        }))
        .unwrap();
        let reading = form.build().unwrap();
        assert_eq!(reading.water_condition, BigDecimal::from_str("5.5").unwrap());
        assert_eq!(reading.air_quality, BigDecimal::from(200));
        assert_eq!(reading.p_id, "P01");
    }

    #[test]
    fn test_environmental_rejects_non_numeric() {
        let form = EnvironmentalForm {
            data_id: Some("D05".to_string()),
            preserve: Some(Selection::Label("P01 - Serengeti".to_string())),
            water_condition: Some(NumericInput::Text("acidic".to_string())),
            weather: Some("Clear".to_string()),
            soil_composition: Some("Loamy".to_string()),
            air_quality: Some(50.into()),
        };
        assert_invalid(form.build(), "Water condition must be a number, got 'acidic'.");
    }

    #[test]
    fn test_environmental_has_no_local_range_check() {
        let form = EnvironmentalForm {
            data_id: Some("D06".to_string()),
            preserve: Some(Selection::Label("P01 - Serengeti".to_string())),
            water_condition: Some((-3.5).into()),
            weather: Some("Smog".to_string()),
            soil_composition: Some("Clay".to_string()),
            air_quality: Some(9999.into()),
        };
        assert!(form.build().is_ok());
    }

    #[test]
    fn test_preserve_requires_all_fields() {
        let form = PreserveForm {
            preserve_id: Some("P05".to_string()),
            name: Some("New Tiger Reserve".to_string()),
            location: Some("Sumatra, Indonesia".to_string()),
            ecosystem: None,
            species: Some(Selection::Label("S01 - Lion".to_string())),
        };
        assert_invalid(form.build(), MSG_PRESERVE_FIELDS);
    }

    #[test]
    fn test_species_form_command() {
        let form = SpeciesForm {
            species_id: Some("S007".to_string()),
            name: Some("Snow Leopard".to_string()),
            classification: Some("Mammal".to_string()),
        };
        let cmd = form.into_command().unwrap();
        assert_eq!(cmd.kind(), "species");
        assert_eq!(cmd.entity_id(), "S007");
    }
}
