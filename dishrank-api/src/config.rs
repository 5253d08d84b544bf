//! API Configuration Module
//!
//! CORS and request hardening settings. Configuration is loaded from
//! environment variables with defaults suitable for development.

use std::net::SocketAddr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::error::{ApiError, ApiResult};

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS and production hardening.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Hardening
    // ========================================================================
    /// Whole-request timeout; slower requests get 408.
    pub request_timeout: Duration,

    /// Maximum number of requests processed at once.
    pub concurrency_limit: usize,

    /// Whether the unauthenticated cache invalidation endpoint is exposed.
    pub cache_admin_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            cache_admin_enabled: false,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `DISHRANK_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `DISHRANK_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `DISHRANK_REQUEST_TIMEOUT_SECS`: Whole-request timeout (default: 30)
    /// - `DISHRANK_CONCURRENCY_LIMIT`: Concurrent requests (default: 512)
    /// - `DISHRANK_CACHE_ADMIN_ENABLED`: "true" or "1" to expose invalidation (default: false)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("DISHRANK_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("DISHRANK_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CORS_MAX_AGE_SECS);

        let request_timeout = std::env::var("DISHRANK_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        let concurrency_limit = std::env::var("DISHRANK_CONCURRENCY_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_CONCURRENCY_LIMIT);

        let cache_admin_enabled = std::env::var("DISHRANK_CACHE_ADMIN_ENABLED")
            .ok()
            .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
            .unwrap_or(false);

        Self {
            cors_origins,
            cors_max_age_secs,
            request_timeout,
            concurrency_limit,
            cache_admin_enabled,
        }
    }

    /// Check if CORS should allow all origins (development mode).
    pub fn cors_allow_all(&self) -> bool {
        self.cors_origins.is_empty()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

/// Resolve the listen address.
///
/// Host from `DISHRANK_API_BIND` (default `0.0.0.0`); port from `PORT`, then
/// `DISHRANK_API_PORT`, then 3000.
pub fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    bind_addr_from(
        std::env::var("DISHRANK_API_BIND").ok(),
        std::env::var("PORT").ok(),
        std::env::var("DISHRANK_API_PORT").ok(),
    )
}

fn bind_addr_from(
    host: Option<String>,
    port: Option<String>,
    api_port: Option<String>,
) -> ApiResult<SocketAddr> {
    let host = host.unwrap_or_else(|| "0.0.0.0".to_string());
    let port_str = port
        .or(api_port)
        .unwrap_or_else(|| DEFAULT_PORT.to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
