//! Service-level endpoints that never touch storage.

use axum::{http::Uri, Json};
use serde_json::{json, Value};

use readwise_core::defaults::SERVICE_NAME;

use crate::error::ApiError;

/// `GET /`: welcome message listing the available routes.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Readwise highlights API",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "POST /api/v1/users/:user_id/parse-kindle-file",
            "GET /api/v1/users/:user_id/book",
            "GET /api/v1/cloud/send-daily-insights",
        ],
    }))
}

/// `GET /health`: liveness only, independent of database state.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
