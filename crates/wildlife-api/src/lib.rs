//! # wildlife-api
//!
//! HTTP surface of the wildlife workbench: entry forms, location search,
//! the preserve dashboard, reports and raw tables, each backed by a service
//! in [`services`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod session;
pub mod state;

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use wildlife_core::defaults::SESSION_HEADER;

pub use config::AppConfig;
pub use error::ApiError;
pub use state::AppState;

use handlers::{dashboard, health, locations, options, reports, submissions, tables};

/// Generates time-ordered UUIDv7 request ids.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// CORS layer for the given origin whitelist. Invalid origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(SESSION_HEADER),
        ])
        .expose_headers([HeaderName::from_static(SESSION_HEADER)])
        .max_age(Duration::from_secs(3600))
}

/// Every route, with session, tracing and request-id layers.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/options", get(options::get_options))
        // Dashboard
        .route(
            "/api/v1/preserves",
            get(dashboard::list_preserves).post(submissions::create_preserve),
        )
        .route("/api/v1/preserves/:id/dashboard", get(dashboard::get_dashboard))
        // Location search
        .route("/api/v1/locations", get(locations::get_locations))
        .route("/api/v1/locations/search", post(locations::search_locations))
        // Submissions
        .route("/api/v1/observations", post(submissions::create_observation))
        .route("/api/v1/species", post(submissions::create_species))
        .route("/api/v1/plans", post(submissions::create_plan))
        .route("/api/v1/assignments", post(submissions::create_assignment))
        .route("/api/v1/environmental", post(submissions::create_environmental))
        // Reports
        .route(
            "/api/v1/reports/project-durations",
            get(reports::project_durations),
        )
        .route("/api/v1/reports/species-counts", get(reports::species_counts))
        .route(
            "/api/v1/reports/last-observations",
            get(reports::last_observations),
        )
        .route("/api/v1/reports/alerts", get(reports::alerts))
        // Raw tables
        .route("/api/v1/tables", get(tables::list_tables))
        .route("/api/v1/tables/:table", get(tables::get_table))
        // Middleware
        .layer(axum::middleware::from_fn(middleware::session_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}
