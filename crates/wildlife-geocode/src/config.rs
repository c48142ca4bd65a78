//! Geocoder configuration.
//!
//! Values come from `GEOCODER_*` environment variables and fall back to
//! [`wildlife_core::defaults`].
//!
//! ```rust,no_run
//! use wildlife_geocode::config::GeocoderConfig;
//!
//! let config = GeocoderConfig::from_env();
//! config.validate().expect("invalid geocoder configuration");
//! ```

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use wildlife_core::{defaults, Error, Result};

/// Settings for the Nominatim client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Service base URL, without the `/search` path.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum matches requested per search.
    pub limit: usize,
    /// `accept-language` sent with each search.
    pub language: String,
    /// Nominatim refuses requests without an identifying agent.
    pub user_agent: String,
    /// When false every search fails as unavailable without a request.
    pub enabled: bool,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GEOCODER_URL.to_string(),
            timeout_secs: defaults::GEOCODER_TIMEOUT_SECS,
            limit: defaults::GEOCODER_LIMIT,
            language: defaults::GEOCODER_LANGUAGE.to_string(),
            user_agent: defaults::GEOCODER_USER_AGENT.to_string(),
            enabled: true,
        }
    }
}

impl GeocoderConfig {
    /// Load from the environment, keeping defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("GEOCODER_URL") {
            config.base_url = url;
        }
        if let Some(secs) = parse_var("GEOCODER_TIMEOUT_SECS") {
            config.timeout_secs = secs;
        }
        if let Some(limit) = parse_var("GEOCODER_LIMIT") {
            config.limit = limit;
        }
        if let Ok(language) = env::var("GEOCODER_LANGUAGE") {
            config.language = language;
        }
        if let Ok(agent) = env::var("GEOCODER_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(enabled) = parse_var("GEOCODER_ENABLED") {
            config.enabled = enabled;
        }
        config
    }

    /// Point the client at another service, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// URL of the search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "GEOCODER_URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "GEOCODER_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(Error::Config("GEOCODER_LIMIT must be at least 1".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::Config(
                "GEOCODER_USER_AGENT cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable setting");
            None
        }
    }
}
