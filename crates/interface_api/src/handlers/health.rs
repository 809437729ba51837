//! Health check handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    pub integrations: usize,
    /// Outbound request totals per integration type
    pub outbound_requests: HashMap<String, u64>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check (includes the integration repository)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    let integrations = state.integrations.list().await.map_err(|e| {
        warn!(error = %e, "Integration repository unavailable");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        integrations: integrations.len(),
        outbound_requests: state.request_counter.snapshot(),
    }))
}
