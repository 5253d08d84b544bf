//! Recipe REST API Routes
//!
//! Keyword search over titles and ingredient names, and full recipe detail.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use dishrank_core::{RecipeDetail, RecipePreview};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::services::RecipeService;
use crate::state::AppState;

/// Query for `GET /recipes/search`.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SearchQuery {
    /// Matched against titles and ingredient names, case-insensitively
    pub keyword: Option<String>,
    /// Maximum results (1-100, default 20)
    pub limit: Option<i64>,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/recipes/search - Search recipes by keyword
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/recipes/search",
    tag = "Recipes",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching recipes", body = Vec<RecipePreview>),
        (status = 400, description = "Missing keyword or invalid limit", body = ApiError),
        (status = 503, description = "Recipe catalogue unavailable", body = ApiError),
    ),
))]
pub async fn search_recipes(
    State(service): State<RecipeService>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<RecipePreview>>> {
    let Query(query) = query.map_err(|rejection| ApiError::invalid_input(rejection.body_text()))?;
    let keyword = query.keyword.ok_or_else(|| ApiError::missing_field("keyword"))?;
    let recipes = service.search_recipes(&keyword, query.limit).await?;
    Ok(Json(recipes))
}

/// GET /api/v1/recipes/{recipe_id} - Full recipe detail
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/recipes/{recipe_id}",
    tag = "Recipes",
    params(
        ("recipe_id" = String, Path, description = "Recipe identifier"),
    ),
    responses(
        (status = 200, description = "Recipe detail", body = RecipeDetail),
        (status = 404, description = "Recipe not found", body = ApiError),
        (status = 503, description = "Recipe catalogue unavailable", body = ApiError),
    ),
))]
pub async fn get_recipe_detail(
    State(service): State<RecipeService>,
    Path(recipe_id): Path<String>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = service.get_recipe_detail(&recipe_id).await?;
    Ok(Json(recipe))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the recipe routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_recipes))
        .route("/:recipe_id", get(get_recipe_detail))
}
