//! In-memory recipe catalogue.
//!
//! Backs local development and tests. Counts every call so callers can assert
//! on catalogue I/O, and can inject latency or failures.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use dishrank_core::{
    CatalogueError, DayKey, DishrankError, DishrankResult, RankingIdList, RecipeDetail,
    RecipePreview,
};

use crate::catalogue::RecipeCatalogue;

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogueCalls {
    pub ranking_lookups: usize,
    pub batch_fetches: usize,
    pub detail_lookups: usize,
    pub searches: usize,
    pub pings: usize,
}

impl CatalogueCalls {
    /// Calls made by the ranking reload path.
    pub fn ranking_io(&self) -> usize {
        self.ranking_lookups + self.batch_fetches
    }
}

#[derive(Debug, Default)]
struct Counters {
    ranking_lookups: AtomicUsize,
    batch_fetches: AtomicUsize,
    detail_lookups: AtomicUsize,
    searches: AtomicUsize,
    pings: AtomicUsize,
}

/// Catalogue held entirely in process memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogue {
    recipes: Arc<RwLock<BTreeMap<String, RecipeDetail>>>,
    ranking_lists: Arc<RwLock<Vec<RankingIdList>>>,
    counters: Arc<Counters>,
    latency: Arc<RwLock<Option<Duration>>>,
    failure: Arc<RwLock<Option<CatalogueError>>>,
}

impl InMemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_recipe(&self, recipe: RecipeDetail) -> DishrankResult<()> {
        let mut recipes = self.recipes.write().map_err(|_| DishrankError::LockPoisoned)?;
        recipes.insert(recipe.recipe_id.clone(), recipe);
        Ok(())
    }

    pub fn insert_ranking_list(&self, list: RankingIdList) -> DishrankResult<()> {
        let mut lists = self
            .ranking_lists
            .write()
            .map_err(|_| DishrankError::LockPoisoned)?;
        lists.push(list);
        Ok(())
    }

    /// Delay every call by `latency` (tokio time, so paused clocks apply).
    pub fn set_latency(&self, latency: Option<Duration>) -> DishrankResult<()> {
        *self.latency.write().map_err(|_| DishrankError::LockPoisoned)? = latency;
        Ok(())
    }

    /// Fail every call with `failure` until cleared.
    pub fn set_failure(&self, failure: Option<CatalogueError>) -> DishrankResult<()> {
        *self.failure.write().map_err(|_| DishrankError::LockPoisoned)? = failure;
        Ok(())
    }

    pub fn calls(&self) -> CatalogueCalls {
        CatalogueCalls {
            ranking_lookups: self.counters.ranking_lookups.load(Ordering::SeqCst),
            batch_fetches: self.counters.batch_fetches.load(Ordering::SeqCst),
            detail_lookups: self.counters.detail_lookups.load(Ordering::SeqCst),
            searches: self.counters.searches.load(Ordering::SeqCst),
            pings: self.counters.pings.load(Ordering::SeqCst),
        }
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.read().map(|r| r.len()).unwrap_or(0)
    }

    async fn enter(&self, counter: &AtomicUsize) -> DishrankResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.read().map_err(|_| DishrankError::LockPoisoned)?;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .failure
            .read()
            .map_err(|_| DishrankError::LockPoisoned)?
            .clone();
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecipeCatalogue for InMemoryCatalogue {
    async fn find_latest_ranking_id_list(
        &self,
        day_key: DayKey,
        source: &str,
    ) -> DishrankResult<Option<RankingIdList>> {
        self.enter(&self.counters.ranking_lookups).await?;
        let lists = self
            .ranking_lists
            .read()
            .map_err(|_| DishrankError::LockPoisoned)?;
        // Later insertions win ties on created_at_kst.
        Ok(lists
            .iter()
            .enumerate()
            .filter(|(_, l)| l.date_kst == day_key && l.source == source)
            .max_by_key(|(i, l)| (l.created_at_kst, *i))
            .map(|(_, l)| l.clone()))
    }

    async fn find_recipes_by_ids(
        &self,
        ids: &[String],
        cap: usize,
    ) -> DishrankResult<Vec<RecipePreview>> {
        self.enter(&self.counters.batch_fetches).await?;
        let recipes = self.recipes.read().map_err(|_| DishrankError::LockPoisoned)?;
        // Catalogue order, not rank order, like a real `IN` query.
        Ok(recipes
            .values()
            .filter(|r| ids.iter().any(|id| *id == r.recipe_id))
            .take(cap)
            .map(RecipeDetail::to_preview)
            .collect())
    }

    async fn find_recipe_by_id(&self, recipe_id: &str) -> DishrankResult<Option<RecipeDetail>> {
        self.enter(&self.counters.detail_lookups).await?;
        let recipes = self.recipes.read().map_err(|_| DishrankError::LockPoisoned)?;
        Ok(recipes.get(recipe_id).cloned())
    }

    async fn search_recipes(
        &self,
        keyword: &str,
        limit: usize,
    ) -> DishrankResult<Vec<RecipePreview>> {
        self.enter(&self.counters.searches).await?;
        let needle = keyword.to_lowercase();
        let recipes = self.recipes.read().map_err(|_| DishrankError::LockPoisoned)?;
        Ok(recipes
            .values()
            .filter(|r| r.matches_keyword(&needle))
            .take(limit)
            .map(RecipeDetail::to_preview)
            .collect())
    }

    async fn ping(&self) -> DishrankResult<()> {
        self.enter(&self.counters.pings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dishrank_core::Ingredient;

    fn recipe(id: &str, title: &str) -> RecipeDetail {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RecipeDetail {
            recipe_id: id.to_string(),
            title: title.to_string(),
            author: "a".to_string(),
            image: "i".to_string(),
            intro: String::new(),
            portion: String::new(),
            cook_time: String::new(),
            level: String::new(),
            detail_url: String::new(),
            ingredients: vec![Ingredient {
                name: "Egg".to_string(),
                desc: None,
                amount: None,
                category: "main".to_string(),
            }],
            steps: vec![],
            registered_at: ts,
            modified_at: ts,
        }
    }

    fn list(day: &str, source: &str, ids: &[&str], hour: u32) -> RankingIdList {
        RankingIdList {
            date_kst: DayKey::parse(day).unwrap(),
            source: source.to_string(),
            recipe_ids: ids.iter().map(|s| s.to_string()).collect(),
            created_at_kst: Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_latest_list_wins() {
        let catalogue = InMemoryCatalogue::new();
        catalogue.insert_ranking_list(list("2024-05-10", "10000recipes", &["a"], 1)).unwrap();
        catalogue.insert_ranking_list(list("2024-05-10", "10000recipes", &["b"], 5)).unwrap();
        catalogue.insert_ranking_list(list("2024-05-10", "other", &["c"], 9)).unwrap();

        let day = DayKey::parse("2024-05-10").unwrap();
        let found = catalogue
            .find_latest_ranking_id_list(day, "10000recipes")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.recipe_ids, vec!["b".to_string()]);

        let other_day = DayKey::parse("2024-05-11").unwrap();
        assert!(catalogue
            .find_latest_ranking_id_list(other_day, "10000recipes")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_batch_fetch_respects_cap() {
        let catalogue = InMemoryCatalogue::new();
        for i in 0..10 {
            catalogue.insert_recipe(recipe(&format!("r{i}"), "t")).unwrap();
        }
        let ids: Vec<String> = (0..10).map(|i| format!("r{i}")).collect();
        let docs = catalogue.find_recipes_by_ids(&ids, 4).await.unwrap();
        assert_eq!(docs.len(), 4);
        assert_eq!(catalogue.calls().batch_fetches, 1);
    }

    #[tokio::test]
    async fn test_search_is_literal_and_case_insensitive() {
        let catalogue = InMemoryCatalogue::new();
        catalogue.insert_recipe(recipe("r1", "Spicy Tofu (Mapo)")).unwrap();
        catalogue.insert_recipe(recipe("r2", "Plain Rice")).unwrap();

        let hits = catalogue.search_recipes("TOFU", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].recipe_id, "r1");

        // Regex metacharacters are plain text.
        assert_eq!(catalogue.search_recipes("(Mapo)", 20).await.unwrap().len(), 1);
        assert!(catalogue.search_recipes(".*", 20).await.unwrap().is_empty());

        // Ingredient names match too.
        assert_eq!(catalogue.search_recipes("egg", 20).await.unwrap().len(), 2);
        assert_eq!(catalogue.search_recipes("egg", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let catalogue = InMemoryCatalogue::new();
        catalogue
            .set_failure(Some(CatalogueError::Unavailable {
                operation: "ping".to_string(),
                reason: "down".to_string(),
            }))
            .unwrap();
        let err = catalogue.ping().await.unwrap_err();
        assert!(err.is_catalogue_failure());

        catalogue.set_failure(None).unwrap();
        assert!(catalogue.ping().await.is_ok());
        assert_eq!(catalogue.calls().pings, 2);
    }
}
