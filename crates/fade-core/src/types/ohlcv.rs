//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Timeframe;

/// One OHLCV bar for one instrument at one sampling interval.
/// Immutable once produced by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price (HLC average), used for profile bucketing.
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }

    /// Calendar day the bar belongs to. Session boundaries are detected
    /// by comparing consecutive bar dates.
    pub fn session_date(&self) -> NaiveDate {
        self.datetime().date_naive()
    }
}

/// Time-series container for bars, optimized for sequential access.
///
/// The series keeps enough history to hand back a complete prior session
/// at rollover, so the capacity should cover at least two trading days of
/// bars at the configured timeframe.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Instrument identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: VecDeque<Bar>,
    /// Maximum capacity (0 = unlimited)
    capacity: usize,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: String, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            timeframe,
            bars: VecDeque::new(),
            capacity: 0,
        }
    }

    /// Create a bar series with a maximum capacity.
    /// When capacity is reached, oldest bars are removed.
    pub fn with_capacity(symbol: String, timeframe: Timeframe, capacity: usize) -> Self {
        Self {
            symbol,
            timeframe,
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new bar, removing the oldest if at capacity.
    pub fn push(&mut self, bar: Bar) {
        if self.capacity > 0 && self.bars.len() >= self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// All bars belonging to one session (calendar day), oldest first.
    /// Used at rollover to hand the prior session to the profile builder.
    pub fn session_bars(&self, date: NaiveDate) -> Vec<Bar> {
        self.bars
            .iter()
            .filter(|b| b.session_date() == date)
            .copied()
            .collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_at(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_bar_typical_price() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);
        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
    }

    #[test]
    fn test_series_capacity() {
        let mut series = BarSeries::with_capacity("EURUSD".to_string(), Timeframe::Min5, 3);
        for i in 0..4 {
            series.push(bar_at(i, 100.0));
        }
        assert_eq!(series.len(), 3);
        assert_eq!(series.iter().next().unwrap().timestamp, 1);
    }

    #[test]
    fn test_session_bars_splits_on_date() {
        let day = 86_400_000;
        let mut series = BarSeries::new("EURUSD".to_string(), Timeframe::Hour1);
        series.push(bar_at(0, 100.0));
        series.push(bar_at(3_600_000, 101.0));
        series.push(bar_at(day, 102.0));

        let first_day = series.session_bars(Bar::new(0, 0.0, 0.0, 0.0, 0.0, 0.0).session_date());
        assert_eq!(first_day.len(), 2);

        let second_day = series.session_bars(bar_at(day, 0.0).session_date());
        assert_eq!(second_day.len(), 1);
        assert_eq!(second_day[0].close, 102.0);
    }
}
