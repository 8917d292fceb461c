//! Health check and readiness routes

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint - GET /health
///
/// Liveness only: returns 200 as long as the process serves requests.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub oracle_configured: bool,
    pub api_keys_configured: bool,
    pub timestamp: String,
}

/// Readiness check endpoint - GET /ready
///
/// Ready once an oracle URL is configured and the key store can authorize
/// at least one caller. Answers 503 otherwise.
pub async fn ready_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let oracle_configured = !state.config.oracle.base_url.trim().is_empty();
    let api_keys_configured = state.key_store.is_ready().await;
    let ready = oracle_configured && api_keys_configured;

    if !ready {
        warn!(
            "Not ready: oracle_configured={}, api_keys_configured={}",
            oracle_configured, api_keys_configured
        );
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready,
            oracle_configured,
            api_keys_configured,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}
