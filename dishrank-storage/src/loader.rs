//! Ranking reload sequence: id list lookup, batch fetch, ordered join.

use dishrank_core::{
    join_ordered, DayKey, DishrankResult, LookupError, RankingConfig, RankingSnapshot, Timestamp,
};
use tracing::{debug, instrument};

use crate::catalogue::RecipeCatalogue;

/// Load and join the ranking for `day_key`.
///
/// Only the first `batch_cap` ids by rank are fetched and joined.
///
/// Fails with `NoRankingData` when no id list exists for the day, when the
/// batch fetch returns nothing, or when no id in the list matched a document.
/// Catalogue failures propagate unchanged.
#[instrument(skip(catalogue, config, loaded_at), fields(source = %config.source))]
pub async fn load_snapshot<C>(
    catalogue: &C,
    config: &RankingConfig,
    day_key: DayKey,
    loaded_at: Timestamp,
) -> DishrankResult<RankingSnapshot>
where
    C: RecipeCatalogue + ?Sized,
{
    let Some(list) = catalogue
        .find_latest_ranking_id_list(day_key, &config.source)
        .await?
    else {
        debug!(%day_key, "no ranking id list");
        return Err(LookupError::NoRankingData { day_key }.into());
    };

    // Cap by rank before fetching; the store returns documents in its own order.
    let capped = &list.recipe_ids[..list.recipe_ids.len().min(config.batch_cap)];
    let documents = catalogue.find_recipes_by_ids(capped, config.batch_cap).await?;
    if documents.is_empty() {
        debug!(%day_key, ids = capped.len(), "ranking ids matched no documents");
        return Err(LookupError::NoRankingData { day_key }.into());
    }

    let recipes = join_ordered(capped, &documents);
    if recipes.is_empty() {
        return Err(LookupError::NoRankingData { day_key }.into());
    }

    debug!(
        %day_key,
        ids = list.recipe_ids.len(),
        capped = capped.len(),
        fetched = documents.len(),
        joined = recipes.len(),
        "ranking snapshot loaded"
    );

    Ok(RankingSnapshot {
        day_key,
        ordered_recipe_ids: list.recipe_ids,
        recipes,
        loaded_at,
    })
}
