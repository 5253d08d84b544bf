//! Error Types for the dishrank API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//! - Mapping from core `DishrankError` values to HTTP status codes
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dishrank_core::{CatalogueError, DishrankError, LookupError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// Field value is out of valid range
    InvalidRange,

    /// Field format is incorrect
    InvalidFormat,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// No ranking exists for the requested day
    RankingNotFound,

    /// Requested recipe does not exist
    RecipeNotFound,

    /// No route matches the request
    RouteNotFound,

    // ========================================================================
    // Server Errors (500, 503, 504)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Database operation failed
    DatabaseError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// Operation timed out
    Timeout,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::InvalidRange
            | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

            ErrorCode::RankingNotFound | ErrorCode::RecipeNotFound | ErrorCode::RouteNotFound => {
                StatusCode::NOT_FOUND
            }

            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,

            ErrorCode::InternalError | ErrorCode::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (offending field, bounds, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    pub fn invalid_range(field: &str, min: impl fmt::Display, max: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("Field '{}' must be between {} and {}", field, min, max),
        )
    }

    pub fn ranking_not_found(day_key: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::RankingNotFound,
            format!("No ranking data found for {}", day_key),
        )
    }

    pub fn recipe_not_found(recipe_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::RecipeNotFound,
            format!("Recipe {} not found", recipe_id),
        )
    }

    pub fn route_not_found(path: &str) -> Self {
        Self::new(ErrorCode::RouteNotFound, format!("No route for {}", path))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn timeout(operation: &str) -> Self {
        Self::new(
            ErrorCode::Timeout,
            format!("Operation '{}' timed out", operation),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Map core errors onto the HTTP surface.
///
/// Lookups that found nothing become 404; store outages become 503 or 504 and
/// are never reported as missing data.
impl From<DishrankError> for ApiError {
    fn from(err: DishrankError) -> Self {
        match err {
            DishrankError::Validation(ValidationError::InvalidDayKeyFormat { input }) => {
                ApiError::new(
                    ErrorCode::InvalidFormat,
                    "Invalid date format. Use YYYY-MM-DD",
                )
                .with_details(serde_json::json!({ "field": "date_kst", "value": input }))
            }
            DishrankError::Validation(ValidationError::LimitOutOfRange {
                field,
                value,
                min,
                max,
            }) => ApiError::invalid_range(&field, min, max)
                .with_details(serde_json::json!({ "field": field, "value": value })),
            DishrankError::Validation(ValidationError::EmptyKeyword) => {
                ApiError::missing_field("keyword")
            }
            DishrankError::Lookup(LookupError::NoRankingData { day_key }) => {
                ApiError::ranking_not_found(day_key)
            }
            DishrankError::Lookup(LookupError::ItemNotFound { recipe_id }) => {
                ApiError::recipe_not_found(recipe_id)
            }
            DishrankError::Catalogue(CatalogueError::Timeout {
                operation,
                elapsed_ms,
            }) => {
                tracing::warn!(operation = %operation, elapsed_ms, "catalogue timeout");
                ApiError::timeout(&operation)
            }
            DishrankError::Catalogue(CatalogueError::Unavailable { operation, reason }) => {
                tracing::error!(operation = %operation, reason = %reason, "catalogue unavailable");
                ApiError::service_unavailable("Recipe catalogue is unavailable")
            }
            DishrankError::Catalogue(CatalogueError::MalformedDocument {
                document_id,
                reason,
            }) => {
                tracing::error!(document_id = %document_id, reason = %reason, "malformed document");
                ApiError::database_error("Stored document could not be read")
            }
            DishrankError::Config(err) => {
                tracing::error!("Configuration error: {}", err);
                ApiError::internal_error("Service is misconfigured")
            }
            DishrankError::LockPoisoned => {
                tracing::error!("ranking cache lock poisoned");
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
