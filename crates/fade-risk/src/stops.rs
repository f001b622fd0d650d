//! Stop-loss / take-profit level calculation.

use fade_core::error::StopError;
use fade_core::types::{Side, StopMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stop parameters from configuration. `stop_loss` and `take_profit` are
/// interpreted according to `mode` (see [`StopMode`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StopParams {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub mode: StopMode,
}

/// Absolute stop levels derived from an entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopLevels {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
}

/// Compute absolute stop-loss and take-profit levels.
///
/// Pure function; `lots` is required for `Value` mode and `tick_size` for
/// `Tick` mode.
///
/// # Errors
/// `StopError::MissingParameter` when the mode's required parameter is
/// absent. Misconfiguration, not a transient condition.
pub fn calc_stops(
    entry: Decimal,
    side: Side,
    params: &StopParams,
    lots: Option<Decimal>,
    tick_size: Option<Decimal>,
) -> Result<StopLevels, StopError> {
    let sl = params.stop_loss;
    let tp = params.take_profit;

    let (stop_loss, take_profit) = match params.mode {
        StopMode::Percent => match side {
            Side::Long => (entry * (Decimal::ONE - sl), entry * (Decimal::ONE + tp)),
            Side::Short => (entry * (Decimal::ONE + sl), entry * (Decimal::ONE - tp)),
        },

        StopMode::Price => match side {
            Side::Long => (entry - sl, entry + tp),
            Side::Short => (entry + sl, entry - tp),
        },

        StopMode::Value => {
            let lots = lots.ok_or(StopError::MissingParameter {
                mode: "Value",
                param: "lot size",
            })?;
            let notional = entry * lots;
            match side {
                Side::Long => (notional - sl, notional + tp),
                Side::Short => (notional + sl, notional - tp),
            }
        }

        StopMode::Tick => {
            let tick = tick_size.ok_or(StopError::MissingParameter {
                mode: "Tick",
                param: "tick size",
            })?;
            match side {
                Side::Long => (entry - tick * sl, entry + tick * tp),
                Side::Short => (entry + tick * sl, entry - tick * tp),
            }
        }
    };

    Ok(StopLevels {
        stop_loss,
        take_profit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn params(mode: StopMode) -> StopParams {
        StopParams {
            stop_loss: dec!(0.01),
            take_profit: dec!(0.01),
            mode,
        }
    }

    #[test]
    fn test_percent_long() {
        let levels = calc_stops(
            dec!(1.1000),
            Side::Long,
            &params(StopMode::Percent),
            None,
            None,
        )
        .unwrap();
        assert_eq!(levels.stop_loss, dec!(1.0890));
        assert_eq!(levels.take_profit, dec!(1.1110));
    }

    #[test]
    fn test_percent_brackets_entry() {
        let entry = dec!(1.1000);
        let long = calc_stops(entry, Side::Long, &params(StopMode::Percent), None, None).unwrap();
        assert!(long.stop_loss < entry && entry < long.take_profit);

        let short = calc_stops(entry, Side::Short, &params(StopMode::Percent), None, None).unwrap();
        assert!(short.take_profit < entry && entry < short.stop_loss);
    }

    #[test]
    fn test_price_mode_offsets() {
        let p = StopParams {
            stop_loss: dec!(0.0050),
            take_profit: dec!(0.0080),
            mode: StopMode::Price,
        };
        let levels = calc_stops(dec!(1.1000), Side::Short, &p, None, None).unwrap();
        assert_eq!(levels.stop_loss, dec!(1.1050));
        assert_eq!(levels.take_profit, dec!(1.0920));
    }

    #[test]
    fn test_value_mode_scales_by_lots() {
        let p = StopParams {
            stop_loss: dec!(100),
            take_profit: dec!(200),
            mode: StopMode::Value,
        };
        let levels = calc_stops(dec!(1.1000), Side::Long, &p, Some(dec!(100000)), None).unwrap();
        assert_eq!(levels.stop_loss, dec!(109900));
        assert_eq!(levels.take_profit, dec!(110200));
    }

    #[test]
    fn test_value_mode_requires_lots() {
        let p = params(StopMode::Value);
        let err = calc_stops(dec!(1.1000), Side::Long, &p, None, None).unwrap_err();
        assert!(matches!(
            err,
            StopError::MissingParameter { mode: "Value", .. }
        ));
    }

    #[test]
    fn test_tick_mode() {
        let p = StopParams {
            stop_loss: dec!(10),
            take_profit: dec!(20),
            mode: StopMode::Tick,
        };
        let levels =
            calc_stops(dec!(1.1000), Side::Long, &p, None, Some(dec!(0.0001))).unwrap();
        assert_eq!(levels.stop_loss, dec!(1.0990));
        assert_eq!(levels.take_profit, dec!(1.1020));
    }

    #[test]
    fn test_tick_mode_requires_tick_size() {
        let p = params(StopMode::Tick);
        let err = calc_stops(dec!(1.1000), Side::Short, &p, Some(dec!(1)), None).unwrap_err();
        assert!(matches!(
            err,
            StopError::MissingParameter { mode: "Tick", .. }
        ));
    }
}
