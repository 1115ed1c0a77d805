//! Heuer Router
//!
//! HTTP front end for the hypothesis evaluation engine. Serves stateless
//! snapshot analysis and stored ACH sessions backed by SQLite.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod rate_limit;

use config::RouterConfig;
use handlers::{create_router, AppState};
use heuer_domain::HypothesisEngine;
use heuer_store::{SqliteStore, StoreError};
use rate_limit::RateLimiter;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Session store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build application state from configuration
pub fn build_state(config: &RouterConfig) -> Result<AppState, RouterError> {
    config.validate()?;

    let store = SqliteStore::new(&config.database_path)?;
    let engine = HypothesisEngine::new(config.policy);
    let limiter = RateLimiter::in_memory(config.rate_limit);

    Ok(AppState::new(store, engine, limiter))
}

/// Start the Router HTTP server
///
/// Opens the session store, configures the engine and rate limiter,
/// and starts the axum server.
pub async fn start_server(config: RouterConfig) -> Result<(), RouterError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Heuer Router");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!(
        "Confidence thresholds: high > {}, medium >= {}",
        config.policy.high_gap, config.policy.medium_gap
    );
    info!(
        "Write limit: {} per {} seconds",
        config.rate_limit.max_writes, config.rate_limit.window_secs
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Router listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| RouterError::Server(e.to_string()))?;

    Ok(())
}
