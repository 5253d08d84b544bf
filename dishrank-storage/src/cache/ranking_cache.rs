//! Day-keyed ranking cache with single-flight reloads.
//!
//! Holds at most one [`RankingSnapshot`]. A hit is served straight from the
//! snapshot with no catalogue I/O. A miss runs the reload sequence; concurrent
//! misses for the same day key share one in-flight reload and observe the same
//! result, success or failure. Failures are never stored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use dishrank_core::{
    Clock, DayKey, DayKeyResolver, DishrankError, DishrankResult, RankingConfig, RankingResponse,
    SharedSnapshot, SnapshotFreshness, Timestamp,
};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use super::read::RankingRead;
use super::stats::{CacheStats, StatsCounters};
use crate::catalogue::RecipeCatalogue;
use crate::loader::load_snapshot;

type ReloadFuture = Shared<BoxFuture<'static, DishrankResult<SharedSnapshot>>>;

/// Marker for the reload currently in flight.
struct InFlight {
    day_key: DayKey,
    generation: u64,
    reload: ReloadFuture,
}

enum MissPath {
    /// Another caller populated the slot while we waited for the marker lock.
    Filled(SharedSnapshot),
    Await {
        reload: ReloadFuture,
        generation: u64,
    },
}

/// Process-wide cache for today's ranking.
pub struct RankingCache<C>
where
    C: RecipeCatalogue + ?Sized + 'static,
{
    catalogue: Arc<C>,
    config: RankingConfig,
    resolver: DayKeyResolver,
    clock: Arc<dyn Clock>,
    slot: Arc<RwLock<Option<SharedSnapshot>>>,
    in_flight: Mutex<Option<InFlight>>,
    next_generation: AtomicU64,
    stats: Arc<StatsCounters>,
}

impl<C> RankingCache<C>
where
    C: RecipeCatalogue + ?Sized + 'static,
{
    pub fn new(catalogue: Arc<C>, config: RankingConfig, clock: Arc<dyn Clock>) -> Self {
        let resolver = config.resolver();
        Self {
            catalogue,
            config,
            resolver,
            clock,
            slot: Arc::new(RwLock::new(None)),
            in_flight: Mutex::new(None),
            next_generation: AtomicU64::new(0),
            stats: Arc::new(StatsCounters::default()),
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn catalogue(&self) -> &Arc<C> {
        &self.catalogue
    }

    /// Day key for the current instant.
    pub fn current_day_key(&self) -> DayKey {
        self.resolver.resolve(self.clock.now())
    }

    /// Today's ranking, sliced to `limit`.
    pub async fn get_today(&self, limit: usize) -> DishrankResult<RankingRead> {
        let now = self.clock.now();
        let today = self.resolver.resolve(now);

        if let Some(snapshot) = self.servable(today)? {
            self.stats.record_hit();
            debug!(%today, snapshot_day = %snapshot.day_key, "ranking cache hit");
            return Ok(RankingRead::from_cache(
                snapshot.to_response(limit),
                snapshot.loaded_at,
            ));
        }

        self.stats.record_miss();
        match self.join_or_start_reload(today, now)? {
            MissPath::Filled(snapshot) => Ok(RankingRead::from_cache(
                snapshot.to_response(limit),
                snapshot.loaded_at,
            )),
            MissPath::Await { reload, generation } => {
                let result = reload.await;
                self.clear_in_flight(generation);
                let snapshot = result?;
                Ok(RankingRead::from_reload(
                    snapshot.to_response(limit),
                    snapshot.loaded_at,
                ))
            }
        }
    }

    /// Ranking for an explicit day, always loaded fresh.
    ///
    /// Never reads or writes the cached snapshot.
    pub async fn get_by_date(
        &self,
        day_key: DayKey,
        limit: usize,
    ) -> DishrankResult<RankingResponse> {
        let snapshot =
            load_snapshot(self.catalogue.as_ref(), &self.config, day_key, self.clock.now()).await?;
        Ok(snapshot.to_response(limit))
    }

    /// Drop the cached snapshot. Returns the day key it held, if any.
    ///
    /// A reload already in flight still stores its result when it finishes.
    pub fn invalidate(&self) -> DishrankResult<Option<DayKey>> {
        let mut slot = self.slot.write().map_err(|_| DishrankError::LockPoisoned)?;
        let dropped = slot.take().map(|s| s.day_key);
        if let Some(day_key) = dropped {
            info!(%day_key, "ranking cache invalidated");
        }
        Ok(dropped)
    }

    /// Currently cached snapshot, regardless of freshness.
    pub fn snapshot(&self) -> DishrankResult<Option<SharedSnapshot>> {
        let slot = self.slot.read().map_err(|_| DishrankError::LockPoisoned)?;
        Ok(slot.clone())
    }

    /// Whether a reload is currently in flight.
    pub fn reload_in_flight(&self) -> DishrankResult<bool> {
        let in_flight = self.in_flight.lock().map_err(|_| DishrankError::LockPoisoned)?;
        Ok(in_flight.is_some())
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // ------------------------------------------------------------------------
    // Miss path
    // ------------------------------------------------------------------------

    /// Cached snapshot if it may be served for `today`.
    fn servable(&self, today: DayKey) -> DishrankResult<Option<SharedSnapshot>> {
        let slot = self.slot.read().map_err(|_| DishrankError::LockPoisoned)?;
        Ok(slot.as_ref().and_then(|snapshot| match self.config.freshness {
            SnapshotFreshness::DayBound if snapshot.day_key != today => None,
            _ => Some(Arc::clone(snapshot)),
        }))
    }

    fn join_or_start_reload(&self, day_key: DayKey, now: Timestamp) -> DishrankResult<MissPath> {
        let mut in_flight = self.in_flight.lock().map_err(|_| DishrankError::LockPoisoned)?;

        if let Some(current) = in_flight.as_ref() {
            if current.day_key == day_key {
                self.stats.record_join();
                debug!(
                    %day_key,
                    generation = current.generation,
                    "joining in-flight ranking reload"
                );
                return Ok(MissPath::Await {
                    reload: current.reload.clone(),
                    generation: current.generation,
                });
            }
        }

        // A reload may have finished between the hit check and taking the lock.
        if let Some(snapshot) = self.servable(day_key)? {
            return Ok(MissPath::Filled(snapshot));
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let reload = self.reload_future(day_key, now, generation);
        *in_flight = Some(InFlight {
            day_key,
            generation,
            reload: reload.clone(),
        });
        Ok(MissPath::Await { reload, generation })
    }

    fn reload_future(&self, day_key: DayKey, now: Timestamp, generation: u64) -> ReloadFuture {
        let catalogue = Arc::clone(&self.catalogue);
        let config = self.config.clone();
        let slot = Arc::clone(&self.slot);
        let stats = Arc::clone(&self.stats);

        async move {
            info!(%day_key, generation, "ranking reload started");
            match load_snapshot(catalogue.as_ref(), &config, day_key, now).await {
                Ok(snapshot) => {
                    let snapshot = Arc::new(snapshot);
                    store_snapshot(&slot, Arc::clone(&snapshot))?;
                    stats.record_reload();
                    info!(
                        %day_key,
                        generation,
                        recipes = snapshot.total_count(),
                        "ranking reload finished"
                    );
                    Ok(snapshot)
                }
                Err(err) => {
                    stats.record_reload_failure();
                    warn!(%day_key, generation, error = %err, "ranking reload failed");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }

    fn clear_in_flight(&self, generation: u64) {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if in_flight.as_ref().map(|f| f.generation) == Some(generation) {
            *in_flight = None;
        }
    }
}

/// Swap `snapshot` into the slot unless the slot holds a later day.
fn store_snapshot(
    slot: &RwLock<Option<SharedSnapshot>>,
    snapshot: SharedSnapshot,
) -> DishrankResult<()> {
    let mut guard = slot.write().map_err(|_| DishrankError::LockPoisoned)?;
    if let Some(current) = guard.as_ref() {
        if current.day_key > snapshot.day_key {
            debug!(
                current = %current.day_key,
                loaded = %snapshot.day_key,
                "keeping newer ranking snapshot"
            );
            return Ok(());
        }
    }
    *guard = Some(snapshot);
    Ok(())
}

impl<C> std::fmt::Debug for RankingCache<C>
where
    C: RecipeCatalogue + ?Sized + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingCache")
            .field("config", &self.config)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================
