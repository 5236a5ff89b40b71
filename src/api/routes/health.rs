//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (Cube answers `/meta`)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Returns 200 only if the Cube backend is reachable.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.gateway.backend_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with backend details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let backend_ok = state.gateway.backend_ready().await;

    Json(HealthResponse {
        status: (if backend_ok { "healthy" } else { "degraded" }).to_string(),
        backend: (if backend_ok { "ok" } else { "unreachable" }).to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
