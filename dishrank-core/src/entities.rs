//! Recipe and ranking entities.

use crate::DayKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    pub category: String,
}

/// Lightweight projection of a recipe, as shown in ranking feeds and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipePreview {
    pub recipe_id: String,
    pub title: String,
    pub author: String,
    pub image: String,
}

/// Full recipe document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeDetail {
    pub recipe_id: String,
    pub title: String,
    pub author: String,
    pub image: String,
    pub intro: String,
    pub portion: String,
    pub cook_time: String,
    pub level: String,
    pub detail_url: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub registered_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub modified_at: Timestamp,
}

impl RecipeDetail {
    /// Project the detail down to its preview fields.
    pub fn to_preview(&self) -> RecipePreview {
        RecipePreview {
            recipe_id: self.recipe_id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            image: self.image.clone(),
        }
    }

    /// Case-insensitive substring match on the title or any ingredient name.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_keyword(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .ingredients
                .iter()
                .any(|i| i.name.to_lowercase().contains(needle))
    }
}

/// A published ranking: recipe ids in rank order for one day and source.
///
/// Several lists may exist for the same day; the latest `created_at_kst` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RankingIdList {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-05-10"))]
    pub date_kst: DayKey,
    pub source: String,
    pub recipe_ids: Vec<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at_kst: Timestamp,
}

/// Immutable, fully joined ranking for one day key.
///
/// Shared behind an `Arc` and replaced wholesale, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingSnapshot {
    pub day_key: DayKey,
    pub ordered_recipe_ids: Vec<String>,
    /// Joined previews in rank order (ids without a document are absent).
    pub recipes: Vec<RecipePreview>,
    pub loaded_at: Timestamp,
}

impl RankingSnapshot {
    pub fn total_count(&self) -> usize {
        self.recipes.len()
    }

    /// Build the response for the first `limit` recipes.
    pub fn to_response(&self, limit: usize) -> RankingResponse {
        RankingResponse {
            date_kst: self.day_key,
            recipes: self.recipes.iter().take(limit).cloned().collect(),
            total_count: self.total_count(),
        }
    }
}

/// Shared handle to a snapshot.
pub type SharedSnapshot = Arc<RankingSnapshot>;

/// Ranking payload returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RankingResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-05-10"))]
    pub date_kst: DayKey,
    pub recipes: Vec<RecipePreview>,
    /// Number of joined recipes before `limit` was applied.
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn detail(id: &str, title: &str, ingredients: &[&str]) -> RecipeDetail {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RecipeDetail {
            recipe_id: id.to_string(),
            title: title.to_string(),
            author: "cook".to_string(),
            image: format!("https://img.test/{id}.jpg"),
            intro: String::new(),
            portion: "2인분".to_string(),
            cook_time: "30분 이내".to_string(),
            level: "초급".to_string(),
            detail_url: format!("https://recipes.test/{id}"),
            ingredients: ingredients
                .iter()
                .map(|n| Ingredient {
                    name: n.to_string(),
                    desc: None,
                    amount: Some("1개".to_string()),
                    category: "main".to_string(),
                })
                .collect(),
            steps: vec!["mix".to_string()],
            registered_at: ts,
            modified_at: ts,
        }
    }

    #[test]
    fn test_keyword_matches_title_case_insensitively() {
        let d = detail("r1", "Kimchi Stew", &["pork"]);
        assert!(d.matches_keyword("kimchi"));
        assert!(d.matches_keyword("stew"));
        assert!(!d.matches_keyword("bulgogi"));
    }

    #[test]
    fn test_keyword_matches_ingredient_name() {
        let d = detail("r1", "된장찌개", &["두부", "Zucchini"]);
        assert!(d.matches_keyword("두부"));
        assert!(d.matches_keyword("zucc"));
    }

    #[test]
    fn test_snapshot_response_slices_but_keeps_total() {
        let recipes: Vec<RecipePreview> = (0..5)
            .map(|i| detail(&format!("r{i}"), "t", &[]).to_preview())
            .collect();
        let snapshot = RankingSnapshot {
            day_key: DayKey::parse("2024-05-10").unwrap(),
            ordered_recipe_ids: recipes.iter().map(|r| r.recipe_id.clone()).collect(),
            recipes,
            loaded_at: Utc::now(),
        };

        let response = snapshot.to_response(2);
        assert_eq!(response.recipes.len(), 2);
        assert_eq!(response.recipes[0].recipe_id, "r0");
        assert_eq!(response.total_count, 5);
    }

    #[test]
    fn test_ranking_response_wire_shape() {
        let response = RankingResponse {
            date_kst: DayKey::parse("2024-05-10").unwrap(),
            recipes: vec![],
            total_count: 0,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["date_kst"], "2024-05-10");
        assert_eq!(json["total_count"], 0);
        assert!(json["recipes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_ingredient_optional_fields_default() {
        let ing: Ingredient =
            serde_json::from_str(r#"{"name":"소금","category":"양념"}"#).unwrap();
        assert_eq!(ing.desc, None);
        assert_eq!(ing.amount, None);
    }
}
