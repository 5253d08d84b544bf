//! Calendar day keys and the cutover-aware resolver.
//!
//! A ranking feed belongs to one local calendar day. The day flips at a
//! configurable cutover hour rather than at midnight, so a request at 03:00
//! local time still belongs to the previous day's feed.

use crate::error::ValidationError;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical `YYYY-MM-DD` key for one ranking day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Strictly parse `YYYY-MM-DD`.
    ///
    /// Rejects anything that is not exactly ten characters with dashes at
    /// positions 4 and 7 and ASCII digits elsewhere, and anything that is
    /// not a real calendar date.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDayKeyFormat {
            input: input.to_string(),
        };

        let bytes = input.as_bytes();
        if bytes.len() != 10 {
            return Err(invalid());
        }
        for (i, b) in bytes.iter().enumerate() {
            let ok = match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            };
            if !ok {
                return Err(invalid());
            }
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(DayKey)
            .map_err(|_| invalid())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DayKey(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayKey::parse(s)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DayKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Maps an instant to the ranking day it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayKeyResolver {
    offset: FixedOffset,
    cutover_hour: u32,
}

impl DayKeyResolver {
    /// Build a resolver. Callers validate inputs through `RankingConfig::validate`;
    /// out-of-range values are clamped here so resolution stays infallible.
    pub fn new(offset_secs: i32, cutover_hour: u32) -> Self {
        let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
        Self {
            offset,
            cutover_hour: cutover_hour.min(23),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn cutover_hour(&self) -> u32 {
        self.cutover_hour
    }

    /// Resolve the day key for `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> DayKey {
        let local = now.with_timezone(&self.offset);
        let date = local.date_naive();
        if local.hour() < self.cutover_hour {
            DayKey(date.pred_opt().unwrap_or(date))
        } else {
            DayKey(date)
        }
    }
}

impl Default for DayKeyResolver {
    /// UTC+09:00 with a 07:00 cutover.
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_TZ_OFFSET_SECS,
            crate::config::DEFAULT_CUTOVER_HOUR,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
