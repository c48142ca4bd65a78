//! Mapping of raw driver errors onto the workbench error taxonomy.

use sqlx::mysql::MySqlDatabaseError;

use wildlife_core::defaults::{
    MYSQL_ER_CHECK_CONSTRAINT_VIOLATED, MYSQL_ER_DUP_ENTRY, MYSQL_ER_SIGNAL_EXCEPTION,
};
use wildlife_core::Error;

/// Where a MySQL error number lands in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    DuplicateKey,
    Rejected,
    Other,
}

/// Classify a MySQL server error number.
pub fn class_of(number: u16) -> ErrorClass {
    match number {
        MYSQL_ER_DUP_ENTRY => ErrorClass::DuplicateKey,
        MYSQL_ER_SIGNAL_EXCEPTION | MYSQL_ER_CHECK_CONSTRAINT_VIOLATED => ErrorClass::Rejected,
        _ => ErrorClass::Other,
    }
}

/// Convert a driver error into a workbench error.
///
/// Server errors keep the server's own message; lost or refused connections
/// become [`Error::Unavailable`].
pub fn classify(err: sqlx::Error) -> Error {
    let server = err
        .as_database_error()
        .and_then(|db| db.try_downcast_ref::<MySqlDatabaseError>())
        .map(|db| (db.number(), db.message().to_string()));

    if let Some((number, message)) = server {
        return match class_of(number) {
            ErrorClass::DuplicateKey => Error::DuplicateKey(message),
            ErrorClass::Rejected => Error::Rejected(message),
            ErrorClass::Other => Error::Database(err),
        };
    }

    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => Error::Unavailable(err.to_string()),
        other => Error::Database(other),
    }
}
