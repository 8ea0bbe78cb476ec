//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

/// Message returned to clients when storage fails. The underlying detail is
/// only written to the log.
pub const STORAGE_FAILURE_MESSAGE: &str = "Failed to save highlights";

/// API error type. Every variant renders as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    PayloadTooLarge(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl From<readwise_core::Error> for ApiError {
    fn from(err: readwise_core::Error) -> Self {
        use readwise_core::Error;
        match err {
            Error::MalformedInput(msg) => ApiError::BadRequest(format!("Error parsing file: {}", msg)),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Timeout(msg) => {
                error!(
                    subsystem = "api",
                    component = "error",
                    op = "map",
                    error = %msg,
                    "Storage deadline exceeded"
                );
                ApiError::ServiceUnavailable("Storage is not responding, try again later".into())
            }
            other if other.is_storage_fault() => {
                error!(
                    subsystem = "api",
                    component = "error",
                    op = "map",
                    error = %other,
                    "Storage operation failed"
                );
                ApiError::Internal(STORAGE_FAILURE_MESSAGE.into())
            }
            other => {
                error!(
                    subsystem = "api",
                    component = "error",
                    op = "map",
                    error = %other,
                    "Unexpected error"
                );
                ApiError::Internal("Internal server error".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "error": self.message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readwise_core::Error;

    #[test]
    fn test_malformed_input_is_bad_request() {
        let err = ApiError::from(Error::MalformedInput("expected value".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("Error parsing file"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = ApiError::from(Error::Conflict("Book B1 already exists".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Book B1 already exists");
    }

    #[test]
    fn test_timeout_maps_to_503() {
        let err = ApiError::from(Error::Timeout("ingest".into()));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_storage_fault_hides_detail() {
        let err = ApiError::from(Error::Internal("connection reset by peer".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), STORAGE_FAILURE_MESSAGE);
        assert!(!err.message().contains("connection reset"));
    }

    #[test]
    fn test_database_error_is_internal() {
        let err = ApiError::from(Error::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), STORAGE_FAILURE_MESSAGE);
    }

    #[test]
    fn test_non_storage_error_is_generic_internal() {
        let err = ApiError::from(Error::Config("PORT is invalid".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }
}
