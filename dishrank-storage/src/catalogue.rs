//! The recipe catalogue seam.
//!
//! The catalogue is the external document store holding recipes and the
//! published ranking id lists. Everything above this trait is storage
//! agnostic; the Postgres adapter lives in the API crate and the in-memory
//! one in [`crate::memory`].

use async_trait::async_trait;
use dishrank_core::{DayKey, DishrankResult, RankingIdList, RecipeDetail, RecipePreview};

/// Read-only access to recipes and ranking id lists.
///
/// Implementations report store failures as `CatalogueError` values so the
/// caller can tell an outage apart from a legitimately empty result.
#[async_trait]
pub trait RecipeCatalogue: Send + Sync {
    /// Latest ranking id list for `day_key` and `source`, by creation time.
    async fn find_latest_ranking_id_list(
        &self,
        day_key: DayKey,
        source: &str,
    ) -> DishrankResult<Option<RankingIdList>>;

    /// Previews for the given ids, in no particular order, at most `cap` of them.
    async fn find_recipes_by_ids(
        &self,
        ids: &[String],
        cap: usize,
    ) -> DishrankResult<Vec<RecipePreview>>;

    /// Full document for one recipe.
    async fn find_recipe_by_id(&self, recipe_id: &str) -> DishrankResult<Option<RecipeDetail>>;

    /// Case-insensitive match of `keyword` against titles and ingredient names.
    ///
    /// The keyword is matched literally, not as a pattern.
    async fn search_recipes(&self, keyword: &str, limit: usize)
        -> DishrankResult<Vec<RecipePreview>>;

    /// Cheap round trip used by readiness probes.
    async fn ping(&self) -> DishrankResult<()>;
}
