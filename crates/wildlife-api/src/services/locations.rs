//! Location resolver: geocoding searches whose results become the session's
//! selectable observation locations.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use wildlife_core::{Error, Geocoder, Notice, Reported};

use crate::session::SessionStore;

pub const MSG_EMPTY_QUERY: &str = "Please enter a location to search.";
pub const MSG_NO_MATCHES: &str = "No locations found.";
pub const MSG_TIMEOUT: &str = "Geolocation service timed out.";
pub const MSG_UNAVAILABLE: &str = "Geolocation service is unavailable. Please try again later.";

/// Drop repeated addresses, keeping the first occurrence of each.
pub fn dedup_preserving_order(addresses: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter(|address| seen.insert(address.clone()))
        .collect()
}

#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    sessions: SessionStore,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, sessions: SessionStore) -> Self {
        Self { geocoder, sessions }
    }

    /// Geocode `query` and store the distinct matches for the session.
    ///
    /// A blank query is refused before any request. A service failure keeps
    /// the previous candidates; zero matches replaces them with nothing.
    pub async fn search(&self, session: &str, query: &str) -> Reported<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Reported::with_notice(Vec::new(), Notice::warning(MSG_EMPTY_QUERY));
        }

        let start = Instant::now();
        match self.geocoder.search(query).await {
            Ok(addresses) => {
                let unique = dedup_preserving_order(addresses);
                info!(
                    subsystem = "api",
                    component = "locations",
                    op = "search",
                    session_id = session,
                    geocoder = self.geocoder.name(),
                    result_count = unique.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Location search complete"
                );
                self.sessions.replace_candidates(session, unique.clone()).await;
                let notice = if unique.is_empty() {
                    Notice::warning(MSG_NO_MATCHES)
                } else {
                    Notice::success(format!(
                        "Found {} unique matches. Select one below.",
                        unique.len()
                    ))
                };
                Reported::with_notice(unique, notice)
            }
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "locations",
                    op = "search",
                    session_id = session,
                    geocoder = self.geocoder.name(),
                    error = %e,
                    "Location search failed"
                );
                let message = match e {
                    Error::GeocodeTimeout(_) => MSG_TIMEOUT,
                    _ => MSG_UNAVAILABLE,
                };
                Reported::with_notice(Vec::new(), Notice::error(message))
            }
        }
    }

    /// Candidates currently held for the session.
    pub async fn candidates(&self, session: &str) -> Vec<String> {
        self.sessions.candidates(session).await
    }
}
