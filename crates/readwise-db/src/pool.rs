//! Connection pool setup.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use readwise_core::defaults::{DEFAULT_DB_CONNECT_TIMEOUT_SECS, DEFAULT_DB_MAX_CONNECTIONS};
use readwise_core::{Error, Result};

/// Sizing and acquire deadline for the shared pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long a request may wait for a free connection.
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Open a pool against `database_url`. Fails fast if the server is
/// unreachable so bootstrap never serves without storage.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    if config.max_connections == 0 {
        return Err(Error::Config("max_connections must be at least 1".to_string()));
    }

    let start = Instant::now();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        connect_timeout_secs = config.connect_timeout.as_secs(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Database pool ready"
    );
    Ok(pool)
}

/// Log pool occupancy after a write; warns when uploads are queueing.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(
        subsystem = "db",
        component = "pool",
        op = "metrics",
        pool_size = size,
        pool_idle = idle,
        "Pool occupancy"
    );
    if size > 0 && idle == 0 {
        warn!(
            subsystem = "db",
            component = "pool",
            op = "metrics",
            pool_size = size,
            "No idle connections left"
        );
    }
}
