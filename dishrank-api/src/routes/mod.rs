//! REST API Routes Module
//!
//! Route handlers grouped by resource, plus the router builder that wires
//! them together with the hardening layers.
//!
//! Includes:
//! - Ranking routes (today, by date, cache status and invalidation)
//! - Recipe routes (keyword search, detail)
//! - Health check endpoints (Kubernetes-compatible)
//! - CORS support for browser-based clients

pub mod health;
pub mod ranking;
pub mod recipe;

use std::time::Duration;

use axum::{
    http::{header, Method, Uri},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::config::ApiConfig;
use crate::constants::API_PREFIX;
use crate::error::ApiError;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

// Re-export route creation functions for convenience
pub use health::create_router as health_router;
pub use ranking::create_router as ranking_router;
pub use recipe::create_router as recipe_router;

// ============================================================================
// OPENAPI ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// FALLBACK
// ============================================================================

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}

// ============================================================================
// ROUTER BUILDER
// ============================================================================

/// Create the complete API router.
///
/// - Ranking routes under /api/v1/rankings/*
/// - Recipe routes under /api/v1/recipes/*
/// - Health checks at /health/*
/// - Metrics at /metrics
/// - OpenAPI spec at /openapi.json
/// - Swagger UI at /swagger-ui (when swagger-ui feature is enabled)
///
/// # Middleware Order (outer to inner)
/// 1. CORS - handles preflight requests
/// 2. Observability - tracing and metrics, sees every final status
/// 3. Timeout - 408 for requests exceeding the configured budget
/// 4. Concurrency limit - queues requests beyond the configured bound
pub fn create_api_router(state: AppState) -> Router {
    let api_config = state.api_config.clone();

    let api_routes = Router::new()
        .nest("/rankings", ranking::create_router())
        .nest("/recipes", recipe::create_router());

    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest(API_PREFIX, api_routes)
        .nest("/health", health::create_router())
        .route("/metrics", get(metrics_handler));

    #[cfg(feature = "openapi")]
    {
        router = router.route("/openapi.json", get(openapi_json));
    }

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
        );
    }

    router
        .fallback(route_not_found)
        .with_state(state)
        .layer(ConcurrencyLimitLayer::new(api_config.concurrency_limit))
        .layer(TimeoutLayer::new(api_config.request_timeout))
        .layer(from_fn(observability_middleware))
        .layer(build_cors_layer(&api_config))
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_allow_all() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<axum::http::HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}
