//! Ranking reads carrying cache provenance.

use dishrank_core::{RankingResponse, Timestamp};

/// Result of a ranking read.
///
/// Carries when the underlying snapshot was loaded and whether it was served
/// from the cache, so callers can log and count without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRead {
    response: RankingResponse,
    loaded_at: Timestamp,
    was_cache_hit: bool,
}

impl RankingRead {
    pub fn from_cache(response: RankingResponse, loaded_at: Timestamp) -> Self {
        Self {
            response,
            loaded_at,
            was_cache_hit: true,
        }
    }

    pub fn from_reload(response: RankingResponse, loaded_at: Timestamp) -> Self {
        Self {
            response,
            loaded_at,
            was_cache_hit: false,
        }
    }

    pub fn response(&self) -> &RankingResponse {
        &self.response
    }

    pub fn into_response(self) -> RankingResponse {
        self.response
    }

    pub fn loaded_at(&self) -> Timestamp {
        self.loaded_at
    }

    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }
}
