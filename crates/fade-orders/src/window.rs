//! Time-of-day trading window parameters.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Trading-hours gates. All comparisons are against the clock handed in by
/// the caller (bar clock in backtests, wall clock live). A `None` field
/// deactivates that gate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TradingWindow {
    /// Time of day from which new orders are allowed
    pub start_time: Option<NaiveTime>,
    /// Time of day after which no new orders are accepted
    /// (open positions may still be closed)
    pub cutoff_time: Option<NaiveTime>,
    /// Time of day at which every open position is force-closed
    pub flatten_time: Option<NaiveTime>,
    /// Minimum seconds between successive order submissions
    pub min_spacing_secs: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_has_no_gates() {
        let w = TradingWindow::default();
        assert!(w.start_time.is_none());
        assert!(w.cutoff_time.is_none());
        assert!(w.flatten_time.is_none());
        assert!(w.min_spacing_secs.is_none());
    }
}
