//! Ranking Service
//!
//! Today's ranking through the cache, and any explicit day through a fresh load.

use std::sync::Arc;

use dishrank_core::{DayKey, DishrankError, DishrankResult, LookupError, RankingResponse};
use tracing::{debug, instrument};

use crate::constants::{DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT, MIN_LIMIT};
use crate::state::ApiRankingCache;
use crate::telemetry::metrics;
use crate::validation::resolve_limit;

#[derive(Clone)]
pub struct RankingService {
    cache: Arc<ApiRankingCache>,
}

impl RankingService {
    pub fn new(cache: Arc<ApiRankingCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ApiRankingCache> {
        &self.cache
    }

    /// Today's ranking, served from the cached snapshot when it is servable.
    ///
    /// # Errors
    /// `LimitOutOfRange` for a limit outside 1..=100, `NoRankingData` when
    /// nothing is published for today, catalogue errors on outage.
    #[instrument(skip(self))]
    pub async fn get_today_ranking(&self, limit: Option<i64>) -> DishrankResult<RankingResponse> {
        let limit = resolve_limit(limit, DEFAULT_RANKING_LIMIT, MIN_LIMIT, MAX_RANKING_LIMIT)?;

        match self.cache.get_today(limit).await {
            Ok(read) => {
                debug!(
                    cache_hit = read.was_cache_hit(),
                    loaded_at = %read.loaded_at(),
                    "today ranking served"
                );
                record_cache_event(if read.was_cache_hit() { "hit" } else { "miss" });
                Ok(read.into_response())
            }
            Err(err) => {
                record_cache_event(reload_failure_event(&err));
                Err(err)
            }
        }
    }

    /// Ranking for an explicit `YYYY-MM-DD` day. Never touches the cache.
    #[instrument(skip(self))]
    pub async fn get_ranking_by_date(
        &self,
        date_kst: &str,
        limit: Option<i64>,
    ) -> DishrankResult<RankingResponse> {
        let day_key = DayKey::parse(date_kst)?;
        let limit = resolve_limit(limit, DEFAULT_RANKING_LIMIT, MIN_LIMIT, MAX_RANKING_LIMIT)?;
        self.cache.get_by_date(day_key, limit).await
    }
}

fn reload_failure_event(err: &DishrankError) -> &'static str {
    match err {
        DishrankError::Lookup(LookupError::NoRankingData { .. }) => "no_data",
        _ => "reload_error",
    }
}

fn record_cache_event(event: &str) {
    if let Some(metrics) = metrics() {
        metrics.record_cache_event(event);
    }
}
