//! Health check handler

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the process started
    pub uptime: u64,
    /// `postgres` or `memory`
    pub storage: &'static str,
    pub telegram: bool,
    pub subscribers: usize,
}

/// Liveness with a storage probe
///
/// GET /health
pub async fn health_check(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let (storage, storage_ok) = match state.database() {
        Some(pool) => ("postgres", pool.acquire().await.is_ok()),
        None => ("memory", true),
    };

    let response = HealthResponse {
        status: if storage_ok { "healthy" } else { "degraded" },
        timestamp: Utc::now(),
        uptime: state.services().counters().uptime_secs(),
        storage,
        telegram: state.telegram_enabled(),
        subscribers: state.broadcast().subscriber_count(),
    };
    let status = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
