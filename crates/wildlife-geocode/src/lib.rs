//! # wildlife-geocode
//!
//! Address lookup for observations made away from a registered preserve.
//!
//! This crate provides:
//! - A Nominatim client implementing [`wildlife_core::Geocoder`]
//! - Environment-driven configuration with bounded timeouts
//! - A scripted geocoder for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Enable [`mock::MockGeocoder`]
//!
//! # Example
//!
//! ```rust,no_run
//! use wildlife_geocode::NominatimGeocoder;
//! use wildlife_core::Geocoder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let geocoder = NominatimGeocoder::from_env().unwrap();
//!     let addresses = geocoder.search("Serengeti").await.unwrap();
//! }
//! ```

pub mod config;
pub mod nominatim;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use wildlife_core::{Error, Geocoder, Result};

pub use config::GeocoderConfig;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockFailure, MockGeocoder};
pub use nominatim::NominatimGeocoder;
