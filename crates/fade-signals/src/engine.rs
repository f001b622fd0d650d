//! Signal generation state machine.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fade_core::error::{EngineResult, SignalError};
use fade_core::traits::SessionProfileBuilder;
use fade_core::types::{Bar, LongMode, SessionProfile, ShortMode, Side, TradeSignal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Signal engine tuning parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Volatility gate: latest stdDev must be at or above this value
    pub std_threshold: f64,
    /// Price must have moved at least this far from the last same-side
    /// signal price before another signal fires
    pub min_price_change: f64,
    /// Minimum seconds between accepted signals
    pub min_signal_interval_secs: i64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            std_threshold: 0.0004,
            min_price_change: 0.0003,
            min_signal_interval_secs: 60 * 5,
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.std_threshold < 0.0 {
            return Err(SignalError::InvalidConfig(
                "std threshold must be non-negative".into(),
            ));
        }
        if self.min_price_change < 0.0 {
            return Err(SignalError::InvalidConfig(
                "minimum price change must be non-negative".into(),
            ));
        }
        if self.min_signal_interval_secs < 0 {
            return Err(SignalError::InvalidConfig(
                "signal interval must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Latest observed bar fields, recorded by `observe`.
#[derive(Debug, Clone, Copy)]
struct Observation {
    at: DateTime<Utc>,
    std_dev: f64,
    open: f64,
    close: f64,
}

/// Per-instrument signal state machine.
///
/// Starts without a session profile (every check yields `None`); once
/// `refresh_profile` runs at session rollover the long/short trade modes are
/// assigned and the engine cycles within the session. `reset` clears the
/// per-session throttling state but not the modes, which are only replaced
/// by the next profile refresh.
pub struct SignalEngine {
    symbol: String,
    config: SignalConfig,
    builder: Arc<dyn SessionProfileBuilder>,

    profile: Option<SessionProfile>,
    long_mode: Option<LongMode>,
    short_mode: Option<ShortMode>,

    last_long_price: Option<f64>,
    last_short_price: Option<f64>,
    last_trade_high: Option<f64>,
    last_trade_low: Option<f64>,
    last_signal_time: Option<DateTime<Utc>>,

    observed: Option<Observation>,
}

impl SignalEngine {
    pub fn new(
        symbol: impl Into<String>,
        config: SignalConfig,
        builder: Arc<dyn SessionProfileBuilder>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            config,
            builder,
            profile: None,
            long_mode: None,
            short_mode: None,
            last_long_price: None,
            last_short_price: None,
            last_trade_high: None,
            last_trade_low: None,
            last_signal_time: None,
            observed: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Current session profile, if one was generated.
    pub fn profile(&self) -> Option<&SessionProfile> {
        self.profile.as_ref()
    }

    /// Record the latest bar's fields. Pure state update, no signal decision.
    pub fn observe(&mut self, at: DateTime<Utc>, std_dev: f64, bar: &Bar) {
        self.observed = Some(Observation {
            at,
            std_dev,
            open: bar.open,
            close: bar.close,
        });
    }

    /// Build a fresh profile from the prior session's bars and derive the
    /// session's trade modes from where the new session opened relative to
    /// the value area.
    pub fn refresh_profile(&mut self, prior_session: &[Bar]) -> EngineResult<()> {
        let profile = self.builder.build(prior_session)?;

        // Session open: the first bar of the new session has already been
        // observed by the time rollover is detected.
        let open = self
            .observed
            .map(|o| o.open)
            .unwrap_or_else(|| prior_session.last().map(|b| b.close).unwrap_or(0.0));

        let long_mode = profile.long_mode_for_open(open);
        let short_mode = profile.short_mode_for_open(open);

        info!(
            symbol = %self.symbol,
            val = profile.value_area_low,
            vah = profile.value_area_high,
            %long_mode,
            %short_mode,
            "session profile refreshed"
        );

        self.profile = Some(profile);
        self.long_mode = Some(long_mode);
        self.short_mode = Some(short_mode);
        Ok(())
    }

    /// Clear the per-session throttle state at the session boundary.
    /// Trade modes are left in place until the next `refresh_profile`.
    pub fn reset(&mut self) {
        self.last_long_price = None;
        self.last_short_price = None;
        self.last_trade_high = None;
        self.last_trade_low = None;
        self.last_signal_time = None;
    }

    /// Evaluate all signal conditions against the latest observed bar.
    ///
    /// Returns `TradeSignal::None` when any throttle blocks or no profile
    /// exists yet. Fails with `SignalError::ModeUnset` only if a profile is
    /// present without assigned modes, which indicates a caller bug.
    pub fn check_signal(&mut self) -> Result<TradeSignal, SignalError> {
        let Some(profile) = self.profile else {
            return Ok(TradeSignal::None);
        };
        let Some(obs) = self.observed else {
            return Ok(TradeSignal::None);
        };

        if !self.interval_elapsed(obs.at) {
            return Ok(TradeSignal::None);
        }

        if obs.std_dev < self.config.std_threshold {
            return Ok(TradeSignal::None);
        }

        let signal = self.mode_signal(&profile, obs.close)?;
        let Some(side) = signal.side() else {
            return Ok(TradeSignal::None);
        };

        if !self.price_change_ok(side, obs.close) || !self.new_extreme_ok(side, obs.close) {
            return Ok(TradeSignal::None);
        }

        self.last_signal_time = Some(obs.at);
        match side {
            Side::Long => {
                self.last_long_price = Some(obs.close);
                self.last_trade_low = Some(obs.close);
            }
            Side::Short => {
                self.last_short_price = Some(obs.close);
                self.last_trade_high = Some(obs.close);
            }
        }

        debug!(symbol = %self.symbol, ?signal, close = obs.close, "signal accepted");
        Ok(signal)
    }

    /// Mode-based price test against the session's reference bands.
    fn mode_signal(
        &self,
        profile: &SessionProfile,
        close: f64,
    ) -> Result<TradeSignal, SignalError> {
        let long_mode = self.long_mode.ok_or_else(|| SignalError::ModeUnset {
            symbol: self.symbol.clone(),
        })?;
        let short_mode = self.short_mode.ok_or_else(|| SignalError::ModeUnset {
            symbol: self.symbol.clone(),
        })?;

        let long_fires = match long_mode {
            LongMode::BelowValueArea => close < profile.value_area_low,
            LongMode::BelowOpeningRange => close < profile.opening_range_low,
        };
        if long_fires {
            return Ok(TradeSignal::Long);
        }

        let short_fires = match short_mode {
            ShortMode::AboveValueArea => close > profile.value_area_high,
            ShortMode::AboveOpeningRange => close > profile.opening_range_high,
        };
        if short_fires {
            return Ok(TradeSignal::Short);
        }

        Ok(TradeSignal::None)
    }

    fn interval_elapsed(&self, now: DateTime<Utc>) -> bool {
        match self.last_signal_time {
            None => true,
            Some(last) => now - last >= Duration::seconds(self.config.min_signal_interval_secs),
        }
    }

    /// Price must have moved at least `min_price_change` from the last
    /// accepted same-side signal. Always true without a prior signal.
    fn price_change_ok(&self, side: Side, close: f64) -> bool {
        match side {
            Side::Long => match self.last_long_price {
                None => true,
                Some(last) => last - close > self.config.min_price_change,
            },
            Side::Short => match self.last_short_price {
                None => true,
                Some(last) => close - last > self.config.min_price_change,
            },
        }
    }

    /// A new extreme must have been made since the last same-side signal:
    /// a lower low for another Long, a higher high for another Short.
    fn new_extreme_ok(&self, side: Side, close: f64) -> bool {
        match side {
            Side::Long => self.last_trade_low.map_or(true, |low| close < low),
            Side::Short => self.last_trade_high.map_or(true, |high| close > high),
        }
    }

    #[cfg(test)]
    fn inject_profile(
        &mut self,
        profile: SessionProfile,
        long_mode: Option<LongMode>,
        short_mode: Option<ShortMode>,
    ) {
        self.profile = Some(profile);
        self.long_mode = long_mode;
        self.short_mode = short_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fade_core::error::DataError;

    struct FixedProfile(SessionProfile);

    impl SessionProfileBuilder for FixedProfile {
        fn build(&self, bars: &[Bar]) -> Result<SessionProfile, DataError> {
            if bars.is_empty() {
                return Err(DataError::NoDataAvailable);
            }
            Ok(self.0)
        }
    }

    fn profile() -> SessionProfile {
        SessionProfile {
            generated_at: DateTime::from_timestamp(0, 0).unwrap(),
            value_area_low: 1.0950,
            value_area_high: 1.1050,
            opening_range_low: 1.0930,
            opening_range_high: 1.1070,
        }
    }

    fn engine() -> SignalEngine {
        SignalEngine::new(
            "EURUSD",
            SignalConfig {
                std_threshold: 0.0004,
                min_price_change: 0.0003,
                min_signal_interval_secs: 300,
            },
            Arc::new(FixedProfile(profile())),
        )
    }

    fn bar(close: f64) -> Bar {
        Bar::new(0, close, close, close, close, 1000.0)
    }

    /// Bar with the session open inside the value area, so modes stay on
    /// the value-area bands.
    fn bar_in_value(close: f64) -> Bar {
        Bar::new(0, 1.1000, close.max(1.1000), close.min(1.1000), close, 1000.0)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_no_profile_yields_none_not_error() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar(1.0900));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::None);
    }

    #[test]
    fn test_long_below_val() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar_in_value(1.0940));
        e.refresh_profile(&[bar(1.1000)]).unwrap();
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);
    }

    #[test]
    fn test_short_above_vah() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar_in_value(1.1060));
        e.refresh_profile(&[bar(1.1000)]).unwrap();
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Short);
    }

    #[test]
    fn test_volatility_gate_blocks() {
        let mut e = engine();
        e.observe(at(0), 0.0003, &bar_in_value(1.0940));
        e.refresh_profile(&[bar(1.1000)]).unwrap();
        assert_eq!(e.check_signal().unwrap(), TradeSignal::None);
    }

    #[test]
    fn test_signal_throttle_blocks_within_interval() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar_in_value(1.0940));
        e.refresh_profile(&[bar(1.1000)]).unwrap();
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);

        // Deeper low, all price conditions hold, but inside the interval.
        e.observe(at(299), 0.0006, &bar_in_value(1.0900));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::None);

        // Interval fully elapsed.
        e.observe(at(300), 0.0006, &bar_in_value(1.0900));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);
    }

    #[test]
    fn test_min_price_change_required_for_repeat() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar_in_value(1.0940));
        e.refresh_profile(&[bar(1.1000)]).unwrap();
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);

        // New low but not far enough below the last long price.
        e.observe(at(600), 0.0006, &bar_in_value(1.0939));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::None);

        e.observe(at(900), 0.0006, &bar_in_value(1.0930));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);
    }

    #[test]
    fn test_new_extreme_required_for_repeat() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar_in_value(1.0900));
        e.refresh_profile(&[bar(1.1000)]).unwrap();
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);

        // Same close again: no new low was made.
        e.observe(at(600), 0.0006, &bar_in_value(1.0900));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::None);
    }

    #[test]
    fn test_reset_clears_throttles_not_modes() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar_in_value(1.0940));
        e.refresh_profile(&[bar(1.1000)]).unwrap();
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);

        e.reset();
        // Immediately after reset the throttles are clear again.
        e.observe(at(1), 0.0006, &bar_in_value(1.0940));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);
    }

    #[test]
    fn test_mode_unset_is_an_error() {
        let mut e = engine();
        e.observe(at(0), 0.0006, &bar_in_value(1.0940));
        e.inject_profile(profile(), None, None);
        assert!(matches!(
            e.check_signal(),
            Err(SignalError::ModeUnset { .. })
        ));
    }

    #[test]
    fn test_mode_assignment_from_session_open() {
        let mut e = engine();
        // Session opened below VAL: long trigger widens to the opening range.
        e.observe(at(0), 0.0006, &bar(1.0940));
        e.refresh_profile(&[bar(1.1000)]).unwrap();

        // 1.0940 is below VAL but not below the opening-range low, so no
        // long fires under BelowOpeningRange mode.
        assert_eq!(e.check_signal().unwrap(), TradeSignal::None);

        e.observe(at(301), 0.0006, &bar(1.0920));
        assert_eq!(e.check_signal().unwrap(), TradeSignal::Long);
    }
}
