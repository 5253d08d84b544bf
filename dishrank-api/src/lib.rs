//! dishrank API - REST layer over the ranking cache and recipe catalogue
//!
//! Axum routes for the daily ranking feed, recipe search and recipe detail,
//! backed by PostgreSQL through [`PgCatalogue`]. Today's ranking is served
//! from the in-process [`RankingCache`](dishrank_storage::RankingCache) held in
//! [`AppState`].

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::{resolve_bind_addr, ApiConfig};
pub use db::{DbConfig, PgCatalogue};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::{RankingService, RecipeService};
pub use state::{ApiRankingCache, AppState};
