//! Scripted geocoder for deterministic workflow tests.
//!
//! ```rust,ignore
//! use wildlife_geocode::mock::MockGeocoder;
//!
//! let geocoder = MockGeocoder::new()
//!     .with_results("Nairobi", ["Nairobi, Kenya", "Nairobi County, Kenya"]);
//! assert_eq!(geocoder.call_count(), 0);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wildlife_core::{Error, Geocoder, Result};

/// How a scripted search should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Fail as if the request exceeded this many seconds.
    Timeout(u64),
    /// Fail as if the service could not be reached.
    Unavailable,
}

/// Geocoder answering from a fixed table of queries.
///
/// Unknown queries return no matches. Every call is recorded.
#[derive(Clone, Default)]
pub struct MockGeocoder {
    responses: HashMap<String, Vec<String>>,
    failure: Option<MockFailure>,
    latency: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `results`, duplicates included.
    pub fn with_results<I, S>(mut self, query: impl Into<String>, results: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses
            .insert(query.into(), results.into_iter().map(Into::into).collect());
        self
    }

    /// Fail every search.
    pub fn failing(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Sleep before answering; pairs with a paused tokio clock.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queries received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.to_string());
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.failure {
            Some(MockFailure::Timeout(secs)) => Err(Error::GeocodeTimeout(secs)),
            Some(MockFailure::Unavailable) => Err(Error::GeocodeUnavailable(
                "mock geocoder unavailable".to_string(),
            )),
            None => Ok(self.responses.get(query).cloned().unwrap_or_default()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
