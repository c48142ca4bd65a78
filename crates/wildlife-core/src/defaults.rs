//! Centralized default constants for the wildlife workbench.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic numbers.

// =============================================================================
// DATABASE
// =============================================================================

/// Default MySQL connection URL.
pub const DATABASE_URL: &str = "mysql://root@localhost/wild_db";

/// The workbench shares one physical connection across all sessions.
pub const DB_MAX_CONNECTIONS: u32 = 1;

/// Connection timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// MySQL error number for a duplicate key (`ER_DUP_ENTRY`).
pub const MYSQL_ER_DUP_ENTRY: u16 = 1062;

/// MySQL error number raised by `SIGNAL` in triggers and procedures.
pub const MYSQL_ER_SIGNAL_EXCEPTION: u16 = 1644;

/// MySQL error number for a violated CHECK constraint.
pub const MYSQL_ER_CHECK_CONSTRAINT_VIOLATED: u16 = 3819;

// =============================================================================
// QUERY CACHE
// =============================================================================

/// Freshness window for cached read queries in seconds.
pub const QUERY_CACHE_TTL_SECS: u64 = 60;

/// Maximum number of distinct query texts held in the cache.
pub const QUERY_CACHE_CAPACITY: usize = 128;

// =============================================================================
// GEOCODING
// =============================================================================

/// Default geocoding service base URL (Nominatim).
pub const GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Timeout for a geocoding request in seconds.
pub const GEOCODER_TIMEOUT_SECS: u64 = 5;

/// Maximum number of matches requested per search.
pub const GEOCODER_LIMIT: usize = 10;

/// Language requested for returned addresses.
pub const GEOCODER_LANGUAGE: &str = "en";

/// User agent sent to the geocoding service.
pub const GEOCODER_USER_AGENT: &str = "wildlife_app";

// =============================================================================
// FORMS
// =============================================================================

/// Status used when an assignment form leaves it blank.
pub const ASSIGNMENT_STATUS: &str = "Actively Monitored";

/// Separator between id and name in presentation labels (`"P01 - Serengeti"`).
pub const LABEL_SEPARATOR: &str = " - ";

// =============================================================================
// ALERT EXPECTATIONS
// =============================================================================
//
// The alert trigger lives in the database. These values only drive the
// informational notice shown after an environmental insert.

/// Air quality index above which an alert is expected.
pub const AIR_QUALITY_ALERT_ABOVE: i64 = 150;

/// Water condition (pH) below which an alert is expected.
pub const WATER_CONDITION_ALERT_BELOW: &str = "6.0";

// =============================================================================
// DASHBOARD
// =============================================================================

/// Number of result sets returned by `sp_GetPreserveDashboard`.
pub const DASHBOARD_RESULT_SETS: usize = 4;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Header carrying the session identifier.
pub const SESSION_HEADER: &str = "x-session-id";
