//! Centralized default constants for the readwise highlights API.
//!
//! Environment variable names and their local-development defaults live
//! here so the server binary, the tests and the database layer agree on
//! them.

// =============================================================================
// SERVER
// =============================================================================

/// Env var: interface to bind the HTTP server to.
pub const ENV_HOST: &str = "HOST";

/// Env var: TCP port for the HTTP server.
pub const ENV_PORT: &str = "PORT";

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8080;

/// Env var: maximum accepted request body for uploads, in bytes.
pub const ENV_MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";

/// 10 MiB. Kindle exports with thousands of highlights stay well below this.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Env var: deadline applied to each storage call, in seconds.
pub const ENV_STORAGE_TIMEOUT_SECS: &str = "STORAGE_TIMEOUT_SECS";

pub const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 10;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "readwise-api";

// =============================================================================
// DATABASE
// =============================================================================

/// Env var: full connection URL. Takes precedence over the individual parts.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
/// Env var: `host:port` of the database server.
pub const ENV_DB_ADDR: &str = "DB_ADDR";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// Env var: seconds to wait for a pooled connection.
pub const ENV_DB_CONNECT_TIMEOUT_SECS: &str = "DB_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PASSWORD: &str = "password";
pub const DEFAULT_DB_ADDR: &str = "localhost:5432";
pub const DEFAULT_DB_NAME: &str = "highlights";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// VALIDATION
// =============================================================================

/// Longest accepted catalog identifier (ASINs are 10 characters; ISBN-13 fits too).
pub const MAX_ASIN_LEN: usize = 64;

/// Longest accepted user identifier in the request path.
pub const MAX_USER_ID_LEN: usize = 128;
