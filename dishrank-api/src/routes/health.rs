//! Health Check Endpoints
//!
//! Kubernetes-compatible health check endpoints:
//! - /health/ping - Simple liveness check
//! - /health/live - Process alive check
//! - /health/ready - Catalogue connectivity plus ranking cache state
//!
//! A cold or stale ranking cache reports `degraded` but keeps the service ready;
//! only an unreachable catalogue makes readiness fail.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use dishrank_core::{aggregate_status, ComponentHealth, HealthStatus};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthDetails {
    pub components: Vec<ComponentHealth>,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping - Simple pong response
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
))]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - Process liveness check
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
))]
pub async fn liveness() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Process is alive".to_string()),
        details: None,
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/ready - Readiness check
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse),
    ),
))]
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let components = vec![check_catalogue(&state).await, check_ranking_cache(&state)];
    let overall_status = aggregate_status(&components);

    let response = HealthResponse {
        status: overall_status,
        message: None,
        details: Some(HealthDetails {
            components,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    };

    let status_code = if overall_status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status_code, Json(response))
}

async fn check_catalogue(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    match state.catalogue.ping().await {
        Ok(()) => ComponentHealth::healthy("catalogue")
            .with_response_time(start.elapsed().as_millis() as u64),
        Err(e) => ComponentHealth::unhealthy("catalogue", format!("Catalogue check failed: {}", e)),
    }
}

fn check_ranking_cache(state: &AppState) -> ComponentHealth {
    let today = state.ranking_cache.current_day_key();
    match state.ranking_cache.snapshot() {
        Ok(Some(snapshot)) if snapshot.day_key == today => {
            ComponentHealth::healthy("ranking_cache")
        }
        Ok(Some(snapshot)) => ComponentHealth::degraded(
            "ranking_cache",
            format!("Serving snapshot for {} while today is {}", snapshot.day_key, today),
        ),
        Ok(None) => ComponentHealth::degraded("ranking_cache", "No snapshot loaded yet"),
        Err(e) => ComponentHealth::unhealthy("ranking_cache", e.to_string()),
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create health check router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            message: None,
            details: Some(HealthDetails {
                components: vec![ComponentHealth::degraded("ranking_cache", "cold")],
                version: "0.1.0".to_string(),
                uptime_seconds: 3,
            }),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "degraded");
        assert!(json.get("message").is_none());
        assert_eq!(json["details"]["components"][0]["component"], "ranking_cache");
    }
}
