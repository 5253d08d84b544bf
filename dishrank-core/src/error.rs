//! Error types for dishrank operations

use crate::DayKey;
use thiserror::Error;

/// Input validation errors raised before any catalogue access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid day key format: {input:?} (expected YYYY-MM-DD)")]
    InvalidDayKeyFormat { input: String },

    #[error("Value {value} for {field} is out of range [{min}, {max}]")]
    LimitOutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Search keyword must not be empty")]
    EmptyKeyword,
}

/// Lookups that completed but found nothing to return.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No ranking data for {day_key}")]
    NoRankingData { day_key: DayKey },

    #[error("Recipe not found: {recipe_id}")]
    ItemNotFound { recipe_id: String },
}

/// Failures talking to the recipe catalogue.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("Catalogue unavailable during {operation}: {reason}")]
    Unavailable { operation: String, reason: String },

    #[error("Catalogue operation {operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    #[error("Malformed document {document_id}: {reason}")]
    MalformedDocument { document_id: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all dishrank errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DishrankError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ranking cache lock poisoned")]
    LockPoisoned,
}

impl DishrankError {
    /// True when the failure came from the catalogue rather than from the request.
    pub fn is_catalogue_failure(&self) -> bool {
        matches!(self, DishrankError::Catalogue(_))
    }
}

/// Result type alias for dishrank operations.
pub type DishrankResult<T> = Result<T, DishrankError>;

// =============================================================================
// TESTS
// =============================================================================
