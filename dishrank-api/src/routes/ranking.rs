//! Ranking REST API Routes
//!
//! Today's ranking (cached), rankings for explicit days (always fresh), and
//! the cache status and invalidation endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use dishrank_core::{DayKey, RankingResponse, SnapshotFreshness, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::RankingService;
use crate::state::{ApiRankingCache, AppState};

// ============================================================================
// TYPES
// ============================================================================

/// `?limit=` query shared by both ranking reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct RankingQuery {
    /// Number of recipes to return (1-100, default 100)
    pub limit: Option<i64>,
}

/// What the ranking cache currently holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CacheStatusResponse {
    /// Day key for the current instant
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-05-10"))]
    pub current_day_key: DayKey,
    /// Day key of the cached snapshot, if any
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub cached_day_key: Option<DayKey>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub loaded_at: Option<Timestamp>,
    pub cached_total_count: Option<usize>,
    pub reload_in_flight: bool,
    /// `day_bound` or `pinned`
    pub freshness: String,
    pub hits: u64,
    pub misses: u64,
    pub reloads: u64,
    pub reload_failures: u64,
    pub single_flight_joins: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InvalidateResponse {
    /// Day key of the snapshot that was dropped
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub invalidated: Option<DayKey>,
}

fn limit_from(query: Result<Query<RankingQuery>, QueryRejection>) -> ApiResult<Option<i64>> {
    query
        .map(|Query(q)| q.limit)
        .map_err(|rejection| ApiError::invalid_input(rejection.body_text()))
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/rankings/today - Today's ranking
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/rankings/today",
    tag = "Rankings",
    params(RankingQuery),
    responses(
        (status = 200, description = "Today's ranked recipes", body = RankingResponse),
        (status = 400, description = "Invalid limit", body = ApiError),
        (status = 404, description = "No ranking published for today", body = ApiError),
        (status = 503, description = "Recipe catalogue unavailable", body = ApiError),
        (status = 504, description = "Recipe catalogue timed out", body = ApiError),
    ),
))]
pub async fn get_today_ranking(
    State(service): State<RankingService>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> ApiResult<Json<RankingResponse>> {
    let limit = limit_from(query)?;
    let response = service.get_today_ranking(limit).await?;
    Ok(Json(response))
}

/// GET /api/v1/rankings/{date_kst} - Ranking for a specific day
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/rankings/{date_kst}",
    tag = "Rankings",
    params(
        (
            "date_kst" = String,
            Path,
            description = "Day in YYYY-MM-DD format",
            example = "2024-05-10"
        ),
        RankingQuery,
    ),
    responses(
        (status = 200, description = "Ranked recipes for the day", body = RankingResponse),
        (status = 400, description = "Malformed date or invalid limit", body = ApiError),
        (status = 404, description = "No ranking for the day", body = ApiError),
        (status = 503, description = "Recipe catalogue unavailable", body = ApiError),
        (status = 504, description = "Recipe catalogue timed out", body = ApiError),
    ),
))]
pub async fn get_ranking_by_date(
    State(service): State<RankingService>,
    Path(date_kst): Path<String>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> ApiResult<Json<RankingResponse>> {
    let limit = limit_from(query)?;
    let response = service.get_ranking_by_date(&date_kst, limit).await?;
    Ok(Json(response))
}

/// GET /api/v1/rankings/cache - Ranking cache status
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/rankings/cache",
    tag = "Rankings",
    responses(
        (status = 200, description = "Cache status", body = CacheStatusResponse),
    ),
))]
pub async fn get_cache_status(
    State(cache): State<Arc<ApiRankingCache>>,
) -> ApiResult<Json<CacheStatusResponse>> {
    let snapshot = cache.snapshot()?;
    let stats = cache.stats();
    let freshness = match cache.config().freshness {
        SnapshotFreshness::DayBound => "day_bound",
        SnapshotFreshness::Pinned => "pinned",
    };

    Ok(Json(CacheStatusResponse {
        current_day_key: cache.current_day_key(),
        cached_day_key: snapshot.as_ref().map(|s| s.day_key),
        loaded_at: snapshot.as_ref().map(|s| s.loaded_at),
        cached_total_count: snapshot.as_ref().map(|s| s.total_count()),
        reload_in_flight: cache.reload_in_flight()?,
        freshness: freshness.to_string(),
        hits: stats.hits,
        misses: stats.misses,
        reloads: stats.reloads,
        reload_failures: stats.reload_failures,
        single_flight_joins: stats.single_flight_joins,
        hit_rate: stats.hit_rate(),
    }))
}

/// DELETE /api/v1/rankings/cache - Drop the cached snapshot
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/v1/rankings/cache",
    tag = "Rankings",
    responses(
        (status = 200, description = "Snapshot dropped", body = InvalidateResponse),
        (status = 404, description = "Cache administration disabled", body = ApiError),
    ),
))]
pub async fn invalidate_cache(
    State(state): State<AppState>,
) -> ApiResult<Json<InvalidateResponse>> {
    if !state.api_config.cache_admin_enabled {
        return Err(ApiError::route_not_found("/api/v1/rankings/cache"));
    }
    let invalidated = state.ranking_cache.invalidate()?;
    Ok(Json(InvalidateResponse { invalidated }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the ranking routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/today", get(get_today_ranking))
        .route("/cache", get(get_cache_status).delete(invalidate_cache))
        .route("/:date_kst", get(get_ranking_by_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_limit_from_query() {
        let uri: Uri = "/today?limit=5".parse().unwrap();
        let query = Query::<RankingQuery>::try_from_uri(&uri);
        assert_eq!(limit_from(query).unwrap(), Some(5));

        let uri: Uri = "/today".parse().unwrap();
        let query = Query::<RankingQuery>::try_from_uri(&uri);
        assert_eq!(limit_from(query).unwrap(), None);
    }

    #[test]
    fn test_non_numeric_limit_is_invalid_input() {
        let uri: Uri = "/today?limit=ten".parse().unwrap();
        let query = Query::<RankingQuery>::try_from_uri(&uri);
        let err = limit_from(query).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidInput);
    }
}
