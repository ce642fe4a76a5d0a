//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use polisher_core::Config;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    build_app(&config, CancellationToken::new()).await
}

/// Build state and router without touching global telemetry.
/// `shutdown` stops the separation queue and kills running separations.
pub async fn build_app(
    config: &Config,
    shutdown: CancellationToken,
) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = storage::setup_storage(config).await?;

    let state = services::initialize_services(config, storage, shutdown)?;

    let router = routes::setup_routes(config, state.clone());

    Ok((state, router))
}
