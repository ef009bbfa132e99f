//! Health check endpoints
//!
//! - `/health` - Status with current usage epoch
//! - `/health/live` - Liveness probe

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Usage accounting for the current epoch
#[derive(Debug, Serialize)]
pub struct UsageStats {
    pub epoch: String,
    pub tracked_clients: usize,
    pub admitted_today: u64,
    pub daily_limit: u32,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub provider: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub usage: UsageStats,
}

/// Simple health response for liveness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

/// Full health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.usage_limiter.snapshot().await;

    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.gateway.provider_name().to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        usage: UsageStats {
            epoch: snapshot.epoch.to_string(),
            tracked_clients: snapshot.tracked_clients,
            admitted_today: snapshot.admitted_today,
            daily_limit: snapshot.daily_limit,
        },
    })
}

/// Liveness probe endpoint
pub async fn liveness_check() -> Json<SimpleHealthResponse> {
    Json(SimpleHealthResponse {
        status: HealthStatus::Healthy,
    })
}
