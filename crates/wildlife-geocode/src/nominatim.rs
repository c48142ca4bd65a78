//! Nominatim geocoding client.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use wildlife_core::{Error, Geocoder, Result};

use crate::config::GeocoderConfig;

/// One entry of a `format=jsonv2` search response. Only the display name
/// is used; the remaining fields are ignored.
#[derive(Debug, Deserialize)]
struct Place {
    display_name: String,
}

/// Geocoder backed by a Nominatim `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    config: GeocoderConfig,
}

impl NominatimGeocoder {
    /// Create a client for the given configuration.
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            url = %config.base_url,
            timeout_secs = config.timeout_secs,
            limit = config.limit,
            enabled = config.enabled,
            "Initializing Nominatim geocoder"
        );

        Ok(Self { client, config })
    }

    /// Create from `GEOCODER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeocoderConfig::from_env())
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::GeocodeTimeout(self.config.timeout_secs)
        } else {
            Error::GeocodeUnavailable(format!("Request failed: {}", e))
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(
        skip(self),
        fields(subsystem = "geocode", component = "nominatim", op = "search")
    )]
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        if !self.config.enabled {
            return Err(Error::GeocodeUnavailable(
                "geocoding is disabled".to_string(),
            ));
        }

        let start = Instant::now();
        let limit = self.config.limit.to_string();
        let response = self
            .client
            .get(self.config.search_url())
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("limit", limit.as_str()),
                ("accept-language", self.config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Geocoding service returned an error status");
            return Err(Error::GeocodeUnavailable(format!(
                "{} returned {}",
                self.name(),
                status
            )));
        }

        let places: Vec<Place> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Error::GeocodeTimeout(self.config.timeout_secs)
            } else {
                Error::GeocodeUnavailable(format!("Failed to parse response: {}", e))
            }
        })?;

        let addresses: Vec<String> = places
            .into_iter()
            .map(|p| p.display_name)
            .filter(|name| !name.trim().is_empty())
            .collect();

        debug!(
            result_count = addresses.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Geocoding complete"
        );
        Ok(addresses)
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}
