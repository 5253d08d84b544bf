//! Constants for the dishrank API
//!
//! Centralizing constants makes them easy to find, modify, and test.

// ============================================================================
// ROUTING
// ============================================================================

/// Prefix for all versioned REST routes
pub const API_PREFIX: &str = "/api/v1";

/// Default listen port when no bind address is configured
pub const DEFAULT_PORT: u16 = 3000;

/// Development server URL
pub const DEV_SERVER_URL: &str = "http://localhost:3000";

// ============================================================================
// LIMITS
// ============================================================================

/// Smallest accepted `limit` on any list endpoint
pub const MIN_LIMIT: i64 = 1;

/// Default number of recipes in a ranking response
pub const DEFAULT_RANKING_LIMIT: i64 = 100;

/// Maximum number of recipes in a ranking response
pub const MAX_RANKING_LIMIT: i64 = 100;

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of search results
pub const MAX_SEARCH_LIMIT: i64 = 100;

// ============================================================================
// CORS
// ============================================================================

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// HARDENING
// ============================================================================

/// Default whole-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default number of requests processed concurrently
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 512;

// ============================================================================
// DATABASE
// ============================================================================

/// Default per-query catalogue timeout in milliseconds
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 3000;

/// Default connection pool size
pub const DEFAULT_DB_POOL_SIZE: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds_are_consistent() {
        assert!(MIN_LIMIT <= DEFAULT_SEARCH_LIMIT && DEFAULT_SEARCH_LIMIT <= MAX_SEARCH_LIMIT);
        assert!(MIN_LIMIT <= DEFAULT_RANKING_LIMIT && DEFAULT_RANKING_LIMIT <= MAX_RANKING_LIMIT);
    }
}
