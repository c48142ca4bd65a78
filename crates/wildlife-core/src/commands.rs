//! Typed commands produced by the form layer and consumed by the dispatcher.

use chrono::NaiveDate;

use crate::models::{
    ConservationPlan, EnvironmentalReading, Observation, ObservationType, PlanAssignment,
    Preserve, RefOption, Species,
};

/// Which species an observation refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesChoice {
    /// A species already in the database.
    Existing(RefOption),
    /// A species inserted in the same unit of work, before the observation.
    New(Species),
}

impl SpeciesChoice {
    pub fn species_id(&self) -> &str {
        match self {
            SpeciesChoice::Existing(opt) => &opt.id,
            SpeciesChoice::New(species) => &species.sp_id,
        }
    }
}

/// Where an observation happened. Exactly one source is ever set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationLocation {
    /// A registered preserve; the location text is the preserve's name.
    Preserve(RefOption),
    /// A geocoded address previously returned to this session.
    Geocoded(String),
}

impl ObservationLocation {
    pub fn location_text(&self) -> &str {
        match self {
            ObservationLocation::Preserve(opt) => &opt.name,
            ObservationLocation::Geocoded(address) => address,
        }
    }

    pub fn preserve_id(&self) -> Option<&str> {
        match self {
            ObservationLocation::Preserve(opt) => Some(&opt.id),
            ObservationLocation::Geocoded(_) => None,
        }
    }
}

/// A validated observation submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationCommand {
    pub observation_id: String,
    pub species: SpeciesChoice,
    pub date: NaiveDate,
    pub obs_type: ObservationType,
    pub location: ObservationLocation,
}

impl ObservationCommand {
    /// Species to insert before the observation, if any.
    pub fn new_species(&self) -> Option<&Species> {
        match &self.species {
            SpeciesChoice::New(species) => Some(species),
            SpeciesChoice::Existing(_) => None,
        }
    }

    /// The row handed to `sp_AddNewObservation`.
    pub fn observation(&self) -> Observation {
        Observation {
            obs_id: self.observation_id.clone(),
            sp_id: self.species.species_id().to_string(),
            obs_date: self.date,
            obs_type: self.obs_type,
            location: self.location.location_text().to_string(),
            p_id: self.location.preserve_id().map(str::to_string),
        }
    }
}

/// A validated write, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Direct insert into `species`.
    Species(Species),
    /// Direct insert into `species_preserves`.
    Preserve(Preserve),
    /// Optional species insert, then `sp_AddNewObservation`.
    Observation(ObservationCommand),
    /// Direct insert into `conservation_plan`.
    Plan(ConservationPlan),
    /// `sp_AssignSpeciesToPlan`.
    Assignment(PlanAssignment),
    /// Direct insert into `environmental_data`.
    Environmental(EnvironmentalReading),
}

impl Command {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Species(_) => "species",
            Command::Preserve(_) => "preserve",
            Command::Observation(_) => "observation",
            Command::Plan(_) => "plan",
            Command::Assignment(_) => "assignment",
            Command::Environmental(_) => "environmental",
        }
    }

    /// Identifier of the primary entity being written.
    pub fn entity_id(&self) -> &str {
        match self {
            Command::Species(s) => &s.sp_id,
            Command::Preserve(p) => &p.p_id,
            Command::Observation(o) => &o.observation_id,
            Command::Plan(p) => &p.proj_id,
            Command::Assignment(a) => &a.proj_id,
            Command::Environmental(e) => &e.data_id,
        }
    }
}

/// What a committed dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A direct insert committed.
    Inserted,
    /// A procedure call committed; `messages` holds every `message` field
    /// found in its result sets, in order.
    Procedure { messages: Vec<String> },
}
