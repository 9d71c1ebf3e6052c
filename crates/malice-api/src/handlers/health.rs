use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    /// Last signature update stamp, if readable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Liveness probe. Always 200; reports the signature stamp when available.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy",
        updated: state.clamav.update_state().read().ok(),
    })
}
