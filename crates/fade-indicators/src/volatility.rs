//! Volatility indicators.

use std::collections::VecDeque;

/// Rolling population standard deviation.
#[derive(Debug, Clone)]
pub struct RollingStdDev {
    period: usize,
    window: VecDeque<f64>,
}

impl RollingStdDev {
    /// Create a new standard deviation over `period` values.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
        }
    }

    /// Feed one value; returns the deviation once the window is full.
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.window.push_back(value);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
        if self.window.len() < self.period {
            return None;
        }

        let n = self.period as f64;
        let mean: f64 = self.window.iter().sum::<f64>() / n;
        let variance: f64 = self.window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt())
    }

    /// Drop all accumulated values.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stddev_warmup() {
        let mut std = RollingStdDev::new(3);
        assert_eq!(std.update(1.0), None);
        assert_eq!(std.update(2.0), None);
        assert!(std.update(3.0).is_some());
    }

    #[test]
    fn test_stddev_known_value() {
        let mut std = RollingStdDev::new(4);
        for v in [2.0, 4.0, 4.0, 4.0] {
            std.update(v);
        }
        // mean 3.5, variance (2.25 + 0.25*3)/4 = 0.75
        let got = std.update(4.0);
        // window is now [4,4,4,4] -> deviation 0
        assert_eq!(got, Some(0.0));

        let mut std = RollingStdDev::new(4);
        let mut last = None;
        for v in [2.0, 4.0, 4.0, 4.0] {
            last = std.update(v);
        }
        assert!((last.unwrap() - 0.75f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_stddev_constant_series_is_zero() {
        let mut std = RollingStdDev::new(5);
        let mut last = None;
        for _ in 0..10 {
            last = std.update(1.1000);
        }
        assert!(last.unwrap().abs() < 1e-12);
    }
}
