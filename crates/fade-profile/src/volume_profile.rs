//! Volume-histogram session profile.

use std::collections::BTreeMap;

use chrono::Duration;
use fade_core::error::DataError;
use fade_core::traits::SessionProfileBuilder;
use fade_core::types::{Bar, SessionProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for profile construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeProfileParams {
    /// Price bucket width
    pub tick_size: f64,
    /// Fraction of traded volume the value area must cover (e.g. 0.7)
    pub value_area: f64,
    /// Length of the opening window, in minutes
    pub opening_range_minutes: i64,
}

impl Default for VolumeProfileParams {
    fn default() -> Self {
        Self {
            tick_size: 0.0002,
            value_area: 0.7,
            opening_range_minutes: 60,
        }
    }
}

/// Histogram-based implementation of [`SessionProfileBuilder`].
#[derive(Debug, Clone)]
pub struct VolumeProfileBuilder {
    params: VolumeProfileParams,
}

impl VolumeProfileBuilder {
    pub fn new(params: VolumeProfileParams) -> Self {
        Self { params }
    }

    fn bucket(&self, price: f64) -> i64 {
        (price / self.params.tick_size).round() as i64
    }

    /// Expand a band around the point of control until the cumulative weight
    /// reaches the value-area fraction. Returns (low bucket, high bucket).
    fn value_area_bounds(&self, hist: &BTreeMap<i64, f64>, total: f64) -> (i64, i64) {
        let (&poc, &poc_weight) = hist
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .expect("histogram is non-empty");

        let min = *hist.keys().next().expect("histogram is non-empty");
        let max = *hist.keys().next_back().expect("histogram is non-empty");
        let target = self.params.value_area * total;

        let mut low = poc;
        let mut high = poc;
        let mut covered = poc_weight;

        while covered < target && (low > min || high < max) {
            let below = if low > min {
                hist.get(&(low - 1)).copied().unwrap_or(0.0)
            } else {
                f64::NEG_INFINITY
            };
            let above = if high < max {
                hist.get(&(high + 1)).copied().unwrap_or(0.0)
            } else {
                f64::NEG_INFINITY
            };

            if below >= above {
                low -= 1;
                covered += below.max(0.0);
            } else {
                high += 1;
                covered += above.max(0.0);
            }
        }

        (low, high)
    }
}

impl SessionProfileBuilder for VolumeProfileBuilder {
    fn build(&self, bars: &[Bar]) -> Result<SessionProfile, DataError> {
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        // Fall back to counting bars when the feed carries no volume.
        let has_volume = bars.iter().any(|b| b.volume > 0.0);

        let mut hist: BTreeMap<i64, f64> = BTreeMap::new();
        let mut total = 0.0;
        for bar in bars {
            let weight = if has_volume { bar.volume } else { 1.0 };
            *hist.entry(self.bucket(bar.typical_price())).or_insert(0.0) += weight;
            total += weight;
        }

        let (low, high) = self.value_area_bounds(&hist, total);
        let value_area_low = low as f64 * self.params.tick_size;
        let value_area_high = high as f64 * self.params.tick_size;

        let session_start = bars[0].datetime();
        let window_end = session_start + Duration::minutes(self.params.opening_range_minutes);
        let mut opening_range_low = bars[0].low;
        let mut opening_range_high = bars[0].high;
        for bar in bars.iter().filter(|b| b.datetime() < window_end) {
            opening_range_low = opening_range_low.min(bar.low);
            opening_range_high = opening_range_high.max(bar.high);
        }

        debug!(
            val = value_area_low,
            vah = value_area_high,
            or_low = opening_range_low,
            or_high = opening_range_high,
            "session profile generated"
        );

        Ok(SessionProfile {
            generated_at: session_start,
            value_area_low,
            value_area_high,
            opening_range_low,
            opening_range_high,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(minute: i64, price: f64, volume: f64) -> Bar {
        Bar::new(minute * 60_000, price, price + 0.0004, price - 0.0004, price, volume)
    }

    fn builder() -> VolumeProfileBuilder {
        VolumeProfileBuilder::new(VolumeProfileParams {
            tick_size: 0.0010,
            value_area: 0.7,
            opening_range_minutes: 60,
        })
    }

    #[test]
    fn test_empty_session_is_an_error() {
        let err = builder().build(&[]).unwrap_err();
        assert!(matches!(err, DataError::NoDataAvailable));
    }

    #[test]
    fn test_value_area_brackets_the_mode() {
        // Volume concentrated at 1.1000, thin tails either side.
        let mut bars = Vec::new();
        for i in 0..20 {
            bars.push(bar(i, 1.1000, 1000.0));
        }
        for i in 20..24 {
            bars.push(bar(i, 1.0950, 50.0));
        }
        for i in 24..28 {
            bars.push(bar(i, 1.1050, 50.0));
        }

        let profile = builder().build(&bars).unwrap();
        assert!(profile.value_area_low <= 1.1000 + 1e-9);
        assert!(profile.value_area_high >= 1.1000 - 1e-9);
        assert!(profile.value_area_low <= profile.value_area_high);
    }

    #[test]
    fn test_opening_range_uses_early_window_only() {
        let mut bars = Vec::new();
        for i in 0..30 {
            bars.push(bar(i, 1.1000, 100.0));
        }
        // Spike after the opening hour must not widen the range.
        bars.push(bar(90, 1.2000, 100.0));

        let profile = builder().build(&bars).unwrap();
        assert!(profile.opening_range_high < 1.15);
        assert!((profile.opening_range_low - (1.1000 - 0.0004)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volume_feed_falls_back_to_counts() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 1.1000, 0.0)).collect();
        let profile = builder().build(&bars).unwrap();
        assert!((profile.value_area_low - 1.1000).abs() < 0.01);
    }
}
