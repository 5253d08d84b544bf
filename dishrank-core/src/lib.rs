//! dishrank core - data types, day keys and the ordered join
//!
//! Pure logic with no I/O. Storage adapters, the ranking cache and the HTTP
//! surface all build on the types defined here.

// ============================================================================
// MODULES
// ============================================================================

pub mod clock;
pub mod config;
pub mod day_key;
pub mod entities;
pub mod error;
pub mod health;
pub mod join;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    RankingConfig, SnapshotFreshness, DEFAULT_BATCH_CAP, DEFAULT_CUTOVER_HOUR,
    DEFAULT_RANKING_SOURCE, DEFAULT_TZ_OFFSET_SECS,
};
pub use day_key::{DayKey, DayKeyResolver};
pub use entities::{
    Ingredient, RankingIdList, RankingResponse, RankingSnapshot, RecipeDetail, RecipePreview,
    SharedSnapshot, Timestamp,
};
pub use error::{
    CatalogueError, ConfigError, DishrankError, DishrankResult, LookupError, ValidationError,
};
pub use health::{aggregate_status, ComponentHealth, HealthStatus};
pub use join::{join_ordered, join_page, JoinedPage, RankKeyed};
