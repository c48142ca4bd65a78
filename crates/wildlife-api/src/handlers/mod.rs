//! HTTP handlers.

pub mod dashboard;
pub mod health;
pub mod locations;
pub mod options;
pub mod reports;
pub mod submissions;
pub mod tables;
