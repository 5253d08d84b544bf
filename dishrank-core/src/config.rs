//! Ranking configuration.
//!
//! Loaded from environment variables with defaults that match the
//! production feed (KST, 07:00 cutover).

use crate::error::ConfigError;
use crate::DayKeyResolver;
use serde::{Deserialize, Serialize};

/// UTC+09:00.
pub const DEFAULT_TZ_OFFSET_SECS: i32 = 9 * 3600;
pub const DEFAULT_CUTOVER_HOUR: u32 = 7;
pub const DEFAULT_RANKING_SOURCE: &str = "10000recipes";
pub const DEFAULT_BATCH_CAP: usize = 200;

/// How a cached snapshot is judged on a cache hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFreshness {
    /// A snapshot is only served while its day key equals the current one.
    #[default]
    DayBound,
    /// The first successful snapshot is served until explicitly invalidated.
    Pinned,
}

impl SnapshotFreshness {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "day_bound" | "daybound" | "day-bound" => Some(Self::DayBound),
            "pinned" => Some(Self::Pinned),
            _ => None,
        }
    }
}

/// Settings for the ranking cache and its reload sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    /// Offset of the ranking timezone from UTC, in seconds.
    pub timezone_offset_secs: i32,
    /// Local hour at which the ranking day flips.
    pub cutover_hour: u32,
    /// Ranking source to read id lists for.
    pub source: String,
    /// Upper bound on documents fetched in one reload.
    pub batch_cap: usize,
    pub freshness: SnapshotFreshness,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            timezone_offset_secs: DEFAULT_TZ_OFFSET_SECS,
            cutover_hour: DEFAULT_CUTOVER_HOUR,
            source: DEFAULT_RANKING_SOURCE.to_string(),
            batch_cap: DEFAULT_BATCH_CAP,
            freshness: SnapshotFreshness::default(),
        }
    }
}

impl RankingConfig {
    /// Create RankingConfig from environment variables.
    ///
    /// Environment variables:
    /// - `DISHRANK_TZ_OFFSET_SECS`: Offset from UTC in seconds (default: 32400)
    /// - `DISHRANK_CUTOVER_HOUR`: Local hour the day flips at (default: 7)
    /// - `DISHRANK_RANKING_SOURCE`: Ranking source name (default: "10000recipes")
    /// - `DISHRANK_BATCH_CAP`: Max documents per reload (default: 200)
    /// - `DISHRANK_SNAPSHOT_FRESHNESS`: "day_bound" or "pinned" (default: day_bound)
    ///
    /// Unparseable values fall back to defaults; call [`validate`](Self::validate)
    /// to reject parseable but out-of-range values.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timezone_offset_secs = std::env::var("DISHRANK_TZ_OFFSET_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timezone_offset_secs);

        let cutover_hour = std::env::var("DISHRANK_CUTOVER_HOUR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cutover_hour);

        let source = std::env::var("DISHRANK_RANKING_SOURCE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.source);

        let batch_cap = std::env::var("DISHRANK_BATCH_CAP")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.batch_cap);

        let freshness = std::env::var("DISHRANK_SNAPSHOT_FRESHNESS")
            .ok()
            .and_then(|s| SnapshotFreshness::parse(&s))
            .unwrap_or(defaults.freshness);

        Self {
            timezone_offset_secs,
            cutover_hour,
            source,
            batch_cap,
            freshness,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // chrono accepts offsets strictly inside +/- 24h.
        if self.timezone_offset_secs.abs() >= 24 * 3600 {
            return Err(ConfigError::InvalidValue {
                field: "timezone_offset_secs".to_string(),
                value: self.timezone_offset_secs.to_string(),
                reason: "must be within +/- 86399 seconds".to_string(),
            });
        }
        if self.cutover_hour > 23 {
            return Err(ConfigError::InvalidValue {
                field: "cutover_hour".to_string(),
                value: self.cutover_hour.to_string(),
                reason: "must be between 0 and 23".to_string(),
            });
        }
        if self.source.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "source".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.batch_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_cap".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn resolver(&self) -> DayKeyResolver {
        DayKeyResolver::new(self.timezone_offset_secs, self.cutover_hour)
    }

    pub fn with_freshness(mut self, freshness: SnapshotFreshness) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_batch_cap(mut self, batch_cap: usize) -> Self {
        self.batch_cap = batch_cap;
        self
    }
}
