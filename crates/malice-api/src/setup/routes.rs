//! Route configuration and setup

use crate::constants::{HEALTH_PATH, SCAN_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use malice_core::PluginConfig;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &PluginConfig, state: Arc<AppState>) -> Router {
    tracing::debug!(
        max_upload_size_bytes = config.max_upload_size_bytes,
        "Request body limit layer enabled"
    );

    Router::new()
        .route(SCAN_PATH, post(handlers::scan_upload))
        .route(HEALTH_PATH, get(handlers::health_check))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}
