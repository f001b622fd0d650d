//! Session profile and per-session trade modes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference distribution derived once per trading session from the prior
/// session's bars.
///
/// Created at session rollover, read-only for the remainder of the session,
/// replaced (never mutated) at the next rollover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionProfile {
    /// When the profile was generated (start of the source session)
    pub generated_at: DateTime<Utc>,
    /// Low bound of the value area
    pub value_area_low: f64,
    /// High bound of the value area
    pub value_area_high: f64,
    /// Low extreme of the opening window
    pub opening_range_low: f64,
    /// High extreme of the opening window
    pub opening_range_high: f64,
}

/// Which reference band governs the long trigger for the current session.
///
/// Assigned once per session right after profile construction, from where
/// the session open sits relative to the value area: an open at or below
/// VAL picks the wider opening-range band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongMode {
    BelowValueArea,
    BelowOpeningRange,
}

/// Which reference band governs the short trigger for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortMode {
    AboveValueArea,
    AboveOpeningRange,
}

impl SessionProfile {
    /// Derive the session's long mode from the session open.
    /// Inclusive comparator: `open <= VAL` picks the opening-range band.
    pub fn long_mode_for_open(&self, open: f64) -> LongMode {
        if open <= self.value_area_low {
            LongMode::BelowOpeningRange
        } else {
            LongMode::BelowValueArea
        }
    }

    /// Derive the session's short mode from the session open.
    /// Inclusive comparator: `open >= VAH` picks the opening-range band.
    pub fn short_mode_for_open(&self, open: f64) -> ShortMode {
        if open >= self.value_area_high {
            ShortMode::AboveOpeningRange
        } else {
            ShortMode::AboveValueArea
        }
    }
}

impl std::fmt::Display for LongMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LongMode::BelowValueArea => write!(f, "Below VAL"),
            LongMode::BelowOpeningRange => write!(f, "Below Range"),
        }
    }
}

impl std::fmt::Display for ShortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShortMode::AboveValueArea => write!(f, "Above VAH"),
            ShortMode::AboveOpeningRange => write!(f, "Above Range"),
        }
    }
}
