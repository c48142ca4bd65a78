//! Error types for the wildlife workbench.

use thiserror::Error;

/// Result type alias using the workbench's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workbench operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The data store could not be reached
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// A row with the same identifier already exists
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A trigger or check constraint refused the write
    #[error("Rejected by database: {0}")]
    Rejected(String),

    /// Geocoding request exceeded its timeout
    #[error("Geocoding timed out after {0}s")]
    GeocodeTimeout(u64),

    /// Geocoding service could not be reached or answered with an error
    #[error("Geocoding unavailable: {0}")]
    GeocodeUnavailable(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (missing or malformed form field)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error means the data store itself is gone, which halts
    /// the session rather than a single submission.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }

    /// Whether the error came from a constraint the database enforces.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Error::DuplicateKey(_) | Error::Rejected(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_duplicate_key() {
        let err = Error::DuplicateKey("Duplicate entry 'S01' for key 'PRIMARY'".to_string());
        assert_eq!(
            err.to_string(),
            "Duplicate key: Duplicate entry 'S01' for key 'PRIMARY'"
        );
    }

    #[test]
    fn test_error_display_rejected() {
        let err = Error::Rejected("End date cannot be before start date".to_string());
        assert_eq!(
            err.to_string(),
            "Rejected by database: End date cannot be before start date"
        );
    }

    #[test]
    fn test_error_display_geocode_timeout() {
        let err = Error::GeocodeTimeout(5);
        assert_eq!(err.to_string(), "Geocoding timed out after 5s");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("Please fill out all observation fields.".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: Please fill out all observation fields."
        );
    }

    #[test]
    fn test_connectivity_classification() {
        assert!(Error::Unavailable("refused".to_string()).is_connectivity());
        assert!(!Error::DuplicateKey("dup".to_string()).is_connectivity());
        assert!(!Error::Internal("x".to_string()).is_connectivity());
    }

    #[test]
    fn test_constraint_classification() {
        assert!(Error::DuplicateKey("dup".to_string()).is_constraint());
        assert!(Error::Rejected("trigger".to_string()).is_constraint());
        assert!(!Error::InvalidInput("missing".to_string()).is_constraint());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
