//! Clinic Integrations - API Server Binary
//!
//! This binary starts the HTTP API server exposing tenant integrations.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin clinic-integrations-api
//!
//! # Run with a catalog and custom retry behaviour
//! API_CATALOG_PATH=./catalog.json API_MATRIX__RETRY_CONDITION=transient_only \
//!     cargo run --bin clinic-integrations-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_CATALOG_PATH` - JSON file with integration records and credential bundles
//! * `API_MATRIX__*` - Matrix adapter settings (timeout, retries, session TTL)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::config::{ApiConfig, IntegrationCatalog};
use interface_api::{create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration and the integration catalog,
/// and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let (config, config_error) = match ApiConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (ApiConfig::default(), Some(e)),
    };

    init_tracing(&config.log_level);

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Invalid environment configuration, using defaults");
    }

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Clinic Integrations API Server"
    );

    let catalog = load_catalog(&config)?;
    tracing::info!(
        integrations = catalog.integrations.len(),
        credential_bundles = catalog.credentials.len(),
        "Integration catalog loaded"
    );

    let state = AppState::from_catalog(config.clone(), catalog).context("building Matrix client")?;
    let matrix = state.matrix.clone();
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Deliver audit events still queued
    matrix.flush().await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads the integration catalog, or an empty one when no path is configured
fn load_catalog(config: &ApiConfig) -> anyhow::Result<IntegrationCatalog> {
    match &config.catalog_path {
        Some(path) => Ok(IntegrationCatalog::load(path)?),
        None => {
            tracing::warn!("No integration catalog configured, serving no integrations");
            Ok(IntegrationCatalog::default())
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
