//! Bar sampling intervals.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Sampling interval of a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Min1,
    Min5,
    Min15,
    Hour1,
    Daily,
}

impl Timeframe {
    /// Duration of one bar at this timeframe.
    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::Min1 => Duration::minutes(1),
            Timeframe::Min5 => Duration::minutes(5),
            Timeframe::Min15 => Duration::minutes(15),
            Timeframe::Hour1 => Duration::hours(1),
            Timeframe::Daily => Duration::days(1),
        }
    }

    /// Duration of one bar in milliseconds.
    pub fn millis(&self) -> i64 {
        self.duration().num_milliseconds()
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::Min1 => write!(f, "1m"),
            Timeframe::Min5 => write!(f, "5m"),
            Timeframe::Min15 => write!(f, "15m"),
            Timeframe::Hour1 => write!(f, "1h"),
            Timeframe::Daily => write!(f, "1d"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(Timeframe::Min5.millis(), 5 * 60 * 1000);
        assert_eq!(Timeframe::Daily.duration(), Duration::days(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Timeframe::Min1.to_string(), "1m");
        assert_eq!(Timeframe::Hour1.to_string(), "1h");
    }
}
