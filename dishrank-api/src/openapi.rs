//! OpenAPI Specification for the dishrank API
//!
//! Generated from the route annotations and the schema derives on the
//! response types.

use utoipa::OpenApi;

use dishrank_core::{
    ComponentHealth, HealthStatus, Ingredient, RankingResponse, RecipeDetail, RecipePreview,
};

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{self, HealthDetails, HealthResponse};
use crate::routes::ranking::{self, CacheStatusResponse, InvalidateResponse};
use crate::routes::recipe;
use crate::telemetry::metrics;

/// OpenAPI document for the dishrank API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "dishrank API",
        version = "0.1.0",
        description = "Daily recipe ranking feed, keyword search and recipe detail",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Rankings", description = "Daily ranking feed and its cache"),
        (name = "Recipes", description = "Recipe search and detail"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        ranking::get_today_ranking,
        ranking::get_ranking_by_date,
        ranking::get_cache_status,
        ranking::invalidate_cache,
        recipe::search_recipes,
        recipe::get_recipe_detail,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(schemas(
        RankingResponse,
        RecipePreview,
        RecipeDetail,
        Ingredient,
        CacheStatusResponse,
        InvalidateResponse,
        HealthResponse,
        HealthDetails,
        HealthStatus,
        ComponentHealth,
        ApiError,
        ErrorCode,
    ))
)]
pub struct ApiDoc;
