//! Ordered join of ranked ids against an unordered document batch.
//!
//! Batch fetches come back in arbitrary order and may miss ids. The join
//! restores rank order, silently drops ids without a document and keeps
//! duplicates exactly as they appear in the id list.

use crate::{RecipeDetail, RecipePreview};
use std::collections::HashMap;

/// Anything that can be matched against a ranked id.
pub trait RankKeyed {
    fn rank_key(&self) -> &str;
}

impl RankKeyed for RecipePreview {
    fn rank_key(&self) -> &str {
        &self.recipe_id
    }
}

impl RankKeyed for RecipeDetail {
    fn rank_key(&self) -> &str {
        &self.recipe_id
    }
}

/// Result of a limited join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedPage<T> {
    pub items: Vec<T>,
    /// Length of the full join before truncation.
    pub total_count: usize,
}

/// Join `documents` onto `ordered_ids`, preserving id order.
pub fn join_ordered<T, S>(ordered_ids: &[S], documents: &[T]) -> Vec<T>
where
    T: RankKeyed + Clone,
    S: AsRef<str>,
{
    // First document wins if the batch repeats an id.
    let mut by_id: HashMap<&str, &T> = HashMap::with_capacity(documents.len());
    for doc in documents {
        by_id.entry(doc.rank_key()).or_insert(doc);
    }

    ordered_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_ref()).map(|doc| (*doc).clone()))
        .collect()
}

/// Join then truncate to `limit`.
///
/// Truncation happens after the full join so that `total_count` reflects
/// every matched id.
pub fn join_page<T, S>(ordered_ids: &[S], documents: &[T], limit: usize) -> JoinedPage<T>
where
    T: RankKeyed + Clone,
    S: AsRef<str>,
{
    let mut items = join_ordered(ordered_ids, documents);
    let total_count = items.len();
    items.truncate(limit);
    JoinedPage { items, total_count }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn preview(id: &str) -> RecipePreview {
        RecipePreview {
            recipe_id: id.to_string(),
            title: format!("title-{id}"),
            author: "author".to_string(),
            image: format!("{id}.jpg"),
        }
    }

    fn ids(items: &[RecipePreview]) -> Vec<&str> {
        items.iter().map(|p| p.recipe_id.as_str()).collect()
    }

    #[test]
    fn test_join_restores_rank_order() {
        let docs = vec![preview("A"), preview("C"), preview("B")];
        let joined = join_ordered(&["C", "A", "B"], &docs);
        assert_eq!(ids(&joined), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_join_drops_missing_ids() {
        let docs = vec![preview("A"), preview("C")];
        let page = join_page(&["C", "X", "A"], &docs, 100);
        assert_eq!(ids(&page.items), vec!["C", "A"]);
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_join_truncates_after_full_join() {
        let id_list: Vec<String> = (0..50).map(|i| format!("r{i}")).collect();
        let mut docs: Vec<RecipePreview> = id_list.iter().map(|id| preview(id)).collect();
        docs.reverse();

        let page = join_page(&id_list, &docs, 10);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_count, 50);
        assert_eq!(page.items[0].recipe_id, "r0");
        assert_eq!(page.items[9].recipe_id, "r9");
    }

    #[test]
    fn test_join_preserves_duplicate_ids() {
        let docs = vec![preview("A"), preview("B")];
        let joined = join_ordered(&["A", "B", "A"], &docs);
        assert_eq!(ids(&joined), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_join_empty_inputs() {
        let empty_ids: [&str; 0] = [];
        assert!(join_ordered(&empty_ids, &[preview("A")]).is_empty());
        assert!(join_ordered::<RecipePreview, _>(&["A"], &[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_join_is_subsequence_of_ids(
            id_list in prop::collection::vec("[a-e]", 0..30),
            doc_ids in prop::collection::hash_set("[a-e]", 0..5),
        ) {
            let docs: Vec<RecipePreview> = doc_ids.iter().map(|id| preview(id)).collect();
            let joined = join_ordered(&id_list, &docs);

            let expected: Vec<&str> = id_list
                .iter()
                .map(String::as_str)
                .filter(|id| doc_ids.contains(*id))
                .collect();
            prop_assert_eq!(ids(&joined), expected);
        }

        #[test]
        fn prop_page_total_is_full_join_length(
            id_list in prop::collection::vec("[a-h]", 0..40),
            doc_ids in prop::collection::hash_set("[a-h]", 0..8),
            limit in 0usize..50,
        ) {
            let docs: Vec<RecipePreview> = doc_ids.iter().map(|id| preview(id)).collect();
            let full = join_ordered(&id_list, &docs);
            let page = join_page(&id_list, &docs, limit);

            prop_assert_eq!(page.total_count, full.len());
            prop_assert_eq!(page.items.len(), full.len().min(limit));
            prop_assert_eq!(&page.items[..], &full[..page.items.len()]);
        }
    }
}
