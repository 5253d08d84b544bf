//! Recipe Service
//!
//! Keyword search and single-recipe lookup. Neither goes through the ranking cache.

use std::sync::Arc;

use dishrank_core::{DishrankResult, LookupError, RecipeDetail, RecipePreview};
use dishrank_storage::RecipeCatalogue;
use tracing::instrument;

use crate::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT, MIN_LIMIT};
use crate::validation::{resolve_limit, ValidateNonEmpty};

#[derive(Clone)]
pub struct RecipeService {
    catalogue: Arc<dyn RecipeCatalogue>,
}

impl RecipeService {
    pub fn new(catalogue: Arc<dyn RecipeCatalogue>) -> Self {
        Self { catalogue }
    }

    /// Recipes whose title or any ingredient name contains `keyword`,
    /// case-insensitively. At most `limit` results (default 20, max 100).
    #[instrument(skip(self))]
    pub async fn search_recipes(
        &self,
        keyword: &str,
        limit: Option<i64>,
    ) -> DishrankResult<Vec<RecipePreview>> {
        let keyword = keyword.validate_keyword()?;
        let limit = resolve_limit(limit, DEFAULT_SEARCH_LIMIT, MIN_LIMIT, MAX_SEARCH_LIMIT)?;
        self.catalogue.search_recipes(keyword, limit).await
    }

    #[instrument(skip(self))]
    pub async fn get_recipe_detail(&self, recipe_id: &str) -> DishrankResult<RecipeDetail> {
        self.catalogue
            .find_recipe_by_id(recipe_id)
            .await?
            .ok_or_else(|| {
                LookupError::ItemNotFound {
                    recipe_id: recipe_id.to_string(),
                }
                .into()
            })
    }
}
