//! Structured logging field names for the wildlife workbench.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Store unreachable, failed write, failed report |
//! | WARN  | Recoverable issue, degraded to empty result |
//! | INFO  | Lifecycle events, committed writes |
//! | DEBUG | Cache hits/misses, decision points |
//! | TRACE | Per-row iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID of the HTTP request (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Session the interaction belongs to.
pub const SESSION_ID: &str = "session_id";

/// Subsystem originating the log event.
/// Values: "api", "database", "geocode"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "query_cache", "dispatcher", "nominatim", "reports"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "connect", "run_query", "dispatch", "search"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Kind of command being dispatched ("observation", "plan", ...).
pub const COMMAND: &str = "command";

/// Identifier of the entity being written.
pub const ENTITY_ID: &str = "entity_id";

/// Preserve identifier.
pub const PRESERVE_ID: &str = "preserve_id";

/// Stored procedure or scalar function name.
pub const ROUTINE: &str = "routine";

/// Query text or geocoding search text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows or candidates returned.
pub const RESULT_COUNT: &str = "result_count";

/// Number of result sets returned by a procedure.
pub const RESULT_SETS: &str = "result_sets";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of open connections.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Whether the result came from the cache.
pub const CACHE_HIT: &str = "cache_hit";
