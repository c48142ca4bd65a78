//! # wildlife-core
//!
//! Core types, traits, and abstractions for the wildlife preservation
//! workbench.
//!
//! This crate holds the data model, the form validation that turns raw input
//! into typed commands, the notice vocabulary shared by every workflow, and
//! the trait seams the database and geocoding crates implement.

pub mod commands;
pub mod defaults;
pub mod error;
pub mod forms;
pub mod logging;
pub mod models;
pub mod notice;
pub mod traits;

// Re-export commonly used types at crate root
pub use commands::*;
pub use error::{Error, Result};
pub use forms::{
    AssignmentForm, EnvironmentalForm, LocationMode, NumericInput, ObservationForm, PlanForm,
    PreserveForm, Selection, SpeciesForm, SpeciesMode,
};
pub use models::*;
pub use notice::{Notice, NoticeLevel, Reported};
pub use traits::*;
