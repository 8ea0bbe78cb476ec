//! Error types for the readwise highlights API.

use thiserror::Error;

/// Result type alias using readwise-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ingestion and storage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Uploaded extract could not be decoded or failed validation
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Invalid request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unique constraint violated (duplicate catalog identifier)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage call exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedInput(e.to_string())
    }
}

impl Error {
    /// True for faults in the storage layer itself, as opposed to the caller's input.
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed_input() {
        let err = Error::MalformedInput("expected value at line 1".to_string());
        assert_eq!(err.to_string(), "Malformed input: expected value at line 1");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict("book B001 already exists".to_string());
        assert_eq!(err.to_string(), "Conflict: book B001 already exists");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("no book for user u1".to_string());
        assert_eq!(err.to_string(), "Not found: no book for user u1");
    }

    #[test]
    fn test_error_display_timeout() {
        let err = Error::Timeout("create_book".to_string());
        assert_eq!(err.to_string(), "Timed out: create_book");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("PORT must be a number".to_string());
        assert_eq!(err.to_string(), "Configuration error: PORT must be a number");
    }

    #[test]
    fn test_from_serde_json_error_is_malformed_input() {
        let json_err = serde_json::from_str::<serde_json::Value>(r#"{"asin": "#).unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::MalformedInput(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_database_error_is_storage_fault() {
        let err = Error::Database(sqlx::Error::PoolTimedOut);
        assert!(err.is_storage_fault());
        assert!(err.to_string().starts_with("Database error:"));
    }

    #[test]
    fn test_input_errors_are_not_storage_faults() {
        assert!(!Error::MalformedInput("x".into()).is_storage_fault());
        assert!(!Error::Conflict("x".into()).is_storage_fault());
        assert!(!Error::NotFound("x".into()).is_storage_fault());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
