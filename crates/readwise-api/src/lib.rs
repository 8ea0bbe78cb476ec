//! # readwise-api
//!
//! HTTP surface for uploading Kindle highlight extracts.
//!
//! The binary in `main.rs` wires [`build_router`] to a PostgreSQL-backed
//! [`readwise_db::Database`]; tests wire it to [`readwise_db::MemoryStore`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use readwise_core::Storage;

pub use config::ApiConfig;
pub use error::ApiError;
pub use services::IngestionService;

/// Generates UUIDv7 request IDs for time-ordered request tracing.
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ingestion: IngestionService,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: &ApiConfig) -> Self {
        Self {
            ingestion: IngestionService::new(storage, config.storage_timeout),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/users/:user_id/parse-kindle-file",
            post(handlers::highlights::parse_kindle_file),
        )
        .route(
            "/users/:user_id/book",
            get(handlers::highlights::get_user_book),
        )
        .route(
            "/cloud/send-daily-insights",
            get(handlers::insights::send_daily_insights),
        );

    Router::new()
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health_check))
        .nest("/api/v1", api)
        .fallback(handlers::system::not_found)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}
