//! readwise-api server binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readwise_api::{build_router, ApiConfig, AppState};
use readwise_db::{Database, PoolConfig, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, rotated daily)
    //   LOG_ANSI    - "true"/"false" override ANSI colors
    //   RUST_LOG    - env filter (default: "readwise_api=debug,readwise_db=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "readwise_api=debug,readwise_db=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let _file_guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("readwise-api.log");
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(file_dir, file_name));

        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ApiConfig::from_env().context("Invalid configuration")?;
    let addr = config.socket_addr()?;

    info!(
        database = %config.redacted_database_url(),
        max_connections = config.db_max_connections,
        "Connecting to database"
    );
    let pool_config = PoolConfig {
        max_connections: config.db_max_connections,
        connect_timeout: config.db_connect_timeout,
    };
    let db = Database::connect(&config.database_url, &pool_config)
        .await
        .context("Failed to connect to database")?;
    db.ensure_schema()
        .await
        .context("Failed to initialize database schema")?;

    let state = AppState::new(Arc::new(db.clone()), &config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
