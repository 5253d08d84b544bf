//! dishrank Test Utilities
//!
//! Centralized test infrastructure for the dishrank workspace:
//! - Proptest generators for recipes, day keys and ranking id lists
//! - Fixtures for seeded catalogues and fixed KST instants
//! - Custom assertions for dishrank error variants

// Re-export the in-memory catalogue from its source crate
pub use dishrank_storage::{CatalogueCalls, InMemoryCatalogue};

// Re-export core types for convenience
pub use dishrank_core::{
    CatalogueError, DayKey, DishrankError, DishrankResult, Ingredient, LookupError, ManualClock,
    RankingConfig, RankingIdList, RankingResponse, RecipeDetail, RecipePreview, Timestamp,
    ValidationError,
};

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating dishrank values.

    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Generate a numeric recipe id like the ones the crawler stores.
    pub fn arb_recipe_id() -> impl Strategy<Value = String> {
        (1_000_000u32..9_999_999u32).prop_map(|n| n.to_string())
    }

    /// Generate a DayKey between 2020-01-01 and 2030-12-31.
    pub fn arb_day_key() -> impl Strategy<Value = DayKey> {
        (0i64..4017).prop_map(|offset| {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
            let date = base
                .checked_add_days(chrono::Days::new(offset as u64))
                .unwrap_or(base);
            DayKey::from_date(date)
        })
    }

    /// Generate a recipe preview.
    pub fn arb_recipe_preview() -> impl Strategy<Value = RecipePreview> {
        (arb_recipe_id(), "[a-z ]{1,24}", "[a-z]{1,12}").prop_map(|(recipe_id, title, author)| {
            RecipePreview {
                image: format!("https://img.test/{recipe_id}.jpg"),
                recipe_id,
                title,
                author,
            }
        })
    }

    /// Generate an id list drawn from a small pool, so duplicates and
    /// ids without documents both occur.
    pub fn arb_ranking_ids(max_len: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec((0u8..32).prop_map(|n| format!("r{n}")), 0..=max_len)
    }

    /// Generate a search keyword, possibly padded with whitespace.
    pub fn arb_keyword() -> impl Strategy<Value = String> {
        ("[ ]{0,2}", "[a-zA-Z]{1,8}", "[ ]{0,2}").prop_map(|(l, k, r)| format!("{l}{k}{r}"))
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use std::sync::Arc;

    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    use super::*;

    /// The UTC instant for `h:00` KST on the given day.
    #[track_caller]
    pub fn kst(year: i32, month: u32, day: u32, hour: u32) -> Timestamp {
        match NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(hour, 0, 0)) {
            Some(local) => Utc.from_utc_datetime(&(local - Duration::hours(9))),
            None => panic!("invalid KST instant {year}-{month}-{day} {hour}:00"),
        }
    }

    /// Parse a day key, panicking on malformed input.
    #[track_caller]
    pub fn day(input: &str) -> DayKey {
        match DayKey::parse(input) {
            Ok(day_key) => day_key,
            Err(e) => panic!("bad fixture day {input}: {e}"),
        }
    }

    /// A complete recipe document with one ingredient.
    pub fn recipe_detail(recipe_id: &str, title: &str) -> RecipeDetail {
        let registered = kst(2024, 1, 1, 9);
        RecipeDetail {
            recipe_id: recipe_id.to_string(),
            title: title.to_string(),
            author: "만개의레시피".to_string(),
            image: format!("https://img.test/{recipe_id}.jpg"),
            intro: format!("{title} intro"),
            portion: "2인분".to_string(),
            cook_time: "30분 이내".to_string(),
            level: "초급".to_string(),
            detail_url: format!("https://www.10000recipe.com/recipe/{recipe_id}"),
            ingredients: vec![Ingredient {
                name: "간장".to_string(),
                desc: None,
                amount: Some("1큰술".to_string()),
                category: "양념".to_string(),
            }],
            steps: vec!["prep".to_string(), "cook".to_string()],
            registered_at: registered,
            modified_at: registered,
        }
    }

    /// Preview matching [`recipe_detail`].
    pub fn recipe_preview(recipe_id: &str, title: &str) -> RecipePreview {
        recipe_detail(recipe_id, title).to_preview()
    }

    /// A ranking list for the default source, created at noon KST that day.
    pub fn ranking_list(date_kst: &str, recipe_ids: &[&str]) -> RankingIdList {
        let date_kst = day(date_kst);
        let date = date_kst.date();
        RankingIdList {
            date_kst,
            source: dishrank_core::DEFAULT_RANKING_SOURCE.to_string(),
            recipe_ids: recipe_ids.iter().map(|s| s.to_string()).collect(),
            created_at_kst: kst(
                chrono::Datelike::year(&date),
                chrono::Datelike::month(&date),
                chrono::Datelike::day(&date),
                12,
            ),
        }
    }

    /// Catalogue holding one recipe per id, titled `recipe {id}`.
    pub fn seeded_catalogue(recipe_ids: &[&str]) -> DishrankResult<Arc<InMemoryCatalogue>> {
        let catalogue = Arc::new(InMemoryCatalogue::new());
        for id in recipe_ids {
            catalogue.insert_recipe(recipe_detail(id, &format!("recipe {id}")))?;
        }
        Ok(catalogue)
    }

    /// Catalogue with recipes and a published ranking for `date_kst`.
    pub fn catalogue_with_ranking(
        date_kst: &str,
        recipe_ids: &[&str],
    ) -> DishrankResult<Arc<InMemoryCatalogue>> {
        let catalogue = seeded_catalogue(recipe_ids)?;
        catalogue.insert_ranking_list(ranking_list(date_kst, recipe_ids))?;
        Ok(catalogue)
    }

    /// Clock pinned to `h:00` KST on the given day.
    pub fn clock_at(year: i32, month: u32, day: u32, hour: u32) -> Arc<ManualClock> {
        Arc::new(ManualClock::new(kst(year, month, day, hour)))
    }

    /// The outage the catalogue reports when the database is down.
    pub fn outage() -> CatalogueError {
        CatalogueError::Unavailable {
            operation: "find_latest_ranking_id_list".to_string(),
            reason: "connection refused".to_string(),
        }
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for dishrank-specific validation.

    use super::*;

    /// Assert that a result is `NoRankingData` for the given day.
    #[track_caller]
    pub fn assert_no_ranking_data<T: std::fmt::Debug>(
        result: &DishrankResult<T>,
        expected: DayKey,
    ) {
        match result {
            Err(DishrankError::Lookup(LookupError::NoRankingData { day_key })) => {
                assert_eq!(*day_key, expected, "Wrong day key in NoRankingData");
            }
            other => panic!("Expected NoRankingData for {}, got: {:?}", expected, other),
        }
    }

    /// Assert that a result is `ItemNotFound`.
    #[track_caller]
    pub fn assert_item_not_found<T: std::fmt::Debug>(result: &DishrankResult<T>) {
        match result {
            Err(DishrankError::Lookup(LookupError::ItemNotFound { .. })) => {}
            other => panic!("Expected ItemNotFound, got: {:?}", other),
        }
    }

    /// Assert that a result failed in the catalogue, not in the lookup.
    #[track_caller]
    pub fn assert_catalogue_failure<T: std::fmt::Debug>(result: &DishrankResult<T>) {
        match result {
            Err(err) if err.is_catalogue_failure() => {}
            other => panic!("Expected catalogue failure, got: {:?}", other),
        }
    }

    /// Assert that a result is a validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &DishrankResult<T>) {
        match result {
            Err(DishrankError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert the recipe ids of a ranking response, in rank order.
    #[track_caller]
    pub fn assert_rank_order(response: &RankingResponse, expected: &[&str]) {
        let actual: Vec<&str> = response.recipes.iter().map(|r| r.recipe_id.as_str()).collect();
        assert_eq!(actual, expected, "Unexpected rank order");
    }
}

#[cfg(test)]
mod tests {
    use super::assertions::*;
    use super::fixtures::*;
    use super::generators::*;
    use chrono::{Datelike, Timelike};
    use proptest::prelude::*;

    #[test]
    fn test_kst_is_nine_hours_ahead() {
        let instant = kst(2024, 5, 10, 7);
        assert_eq!(instant.day(), 9);
        assert_eq!(instant.hour(), 22);
    }

    #[test]
    fn test_catalogue_with_ranking() -> dishrank_core::DishrankResult<()> {
        let catalogue = catalogue_with_ranking("2024-05-10", &["1", "2"])?;
        assert_eq!(catalogue.recipe_count(), 2);
        Ok(())
    }

    #[test]
    fn test_assert_no_ranking_data() {
        let result: super::DishrankResult<()> = Err(super::LookupError::NoRankingData {
            day_key: day("2024-05-10"),
        }
        .into());
        assert_no_ranking_data(&result, day("2024-05-10"));
    }

    proptest! {
        #[test]
        fn prop_generated_day_keys_round_trip(day_key in arb_day_key()) {
            let parsed = super::DayKey::parse(&day_key.to_string());
            prop_assert_eq!(parsed, Ok(day_key));
        }

        #[test]
        fn prop_generated_keywords_have_content(keyword in arb_keyword()) {
            prop_assert!(!keyword.trim().is_empty());
        }

        #[test]
        fn prop_join_keeps_rank_order_of_stored_ids(
            ids in arb_ranking_ids(24),
            stored in prop::collection::btree_set(0u8..32, 0..32),
            template in arb_recipe_preview(),
        ) {
            // Batch comes back in catalogue order, not rank order.
            let documents: Vec<super::RecipePreview> = stored
                .iter()
                .map(|n| super::RecipePreview {
                    recipe_id: format!("r{n}"),
                    ..template.clone()
                })
                .collect();

            let joined = dishrank_core::join_ordered(&ids, &documents);
            let expected: Vec<&String> = ids
                .iter()
                .filter(|id| documents.iter().any(|d| &d.recipe_id == *id))
                .collect();
            let actual: Vec<&String> = joined.iter().map(|p| &p.recipe_id).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
