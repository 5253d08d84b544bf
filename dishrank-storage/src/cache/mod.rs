//! Ranking cache.
//!
//! One snapshot slot keyed by the resolved day, with explicit freshness
//! semantics (see [`dishrank_core::SnapshotFreshness`]) and reads that report
//! whether they were served from the cache.

pub mod ranking_cache;
pub mod read;
pub mod stats;

pub use ranking_cache::RankingCache;
pub use read::RankingRead;
pub use stats::CacheStats;
