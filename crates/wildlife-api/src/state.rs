//! Shared application state.

use std::sync::Arc;

use wildlife_core::Geocoder;
use wildlife_db::Database;

use crate::services::{
    DashboardService, LocationResolver, ReportAggregator, SubmissionService, TableBrowser,
};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub locations: LocationResolver,
    pub submissions: SubmissionService,
    pub dashboard: DashboardService,
    pub reports: ReportAggregator,
    pub tables: TableBrowser,
}

impl AppState {
    pub fn new(db: Database, geocoder: Arc<dyn Geocoder>) -> Self {
        let sessions = SessionStore::new();
        Self {
            locations: LocationResolver::new(geocoder, sessions.clone()),
            submissions: SubmissionService::new(db.clone(), sessions.clone()),
            dashboard: DashboardService::new(db.clone()),
            reports: ReportAggregator::new(db.clone()),
            tables: TableBrowser::new(db.clone()),
            sessions,
            db,
        }
    }
}
