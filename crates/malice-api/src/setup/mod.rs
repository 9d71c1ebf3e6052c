//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use malice_core::PluginConfig;
use std::sync::Arc;

/// Build the shared state and router from configuration.
pub fn initialize_app(config: &PluginConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    if !config.upload_dir.is_dir() {
        tracing::warn!(
            upload_dir = %config.upload_dir.display(),
            "Upload directory does not exist; uploads will fail until it is created"
        );
    }

    let state = Arc::new(AppState::from_config(config));
    let router = routes::setup_routes(config, state.clone());

    Ok((state, router))
}
