//! Shared application state for Axum routers.

use std::sync::Arc;

use dishrank_core::{Clock, RankingConfig};
use dishrank_storage::{RankingCache, RecipeCatalogue};

use crate::config::ApiConfig;
use crate::services::{RankingService, RecipeService};

/// The ranking cache as wired into the API, over any catalogue backend.
pub type ApiRankingCache = RankingCache<dyn RecipeCatalogue>;

/// Application-wide state shared across all routes.
///
/// The ranking cache lives here and nowhere else; every handler reaches it
/// through [`RankingService`].
#[derive(Clone)]
pub struct AppState {
    pub catalogue: Arc<dyn RecipeCatalogue>,
    pub ranking_cache: Arc<ApiRankingCache>,
    pub ranking_service: RankingService,
    pub recipe_service: RecipeService,
    pub api_config: ApiConfig,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(
        catalogue: Arc<dyn RecipeCatalogue>,
        ranking_config: RankingConfig,
        clock: Arc<dyn Clock>,
        api_config: ApiConfig,
    ) -> Self {
        let ranking_cache = Arc::new(RankingCache::new(
            Arc::clone(&catalogue),
            ranking_config,
            clock,
        ));
        Self {
            ranking_service: RankingService::new(Arc::clone(&ranking_cache)),
            recipe_service: RecipeService::new(Arc::clone(&catalogue)),
            catalogue,
            ranking_cache,
            api_config,
            start_time: std::time::Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<dyn RecipeCatalogue>, catalogue);
crate::impl_from_ref!(Arc<ApiRankingCache>, ranking_cache);
crate::impl_from_ref!(RankingService, ranking_service);
crate::impl_from_ref!(RecipeService, recipe_service);
crate::impl_from_ref!(ApiConfig, api_config);
crate::impl_from_ref!(std::time::Instant, start_time);
