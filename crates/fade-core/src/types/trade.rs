//! Trade order record: one open or closed trade.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// One trade from creation through execution and closure.
///
/// Owns its own absolute stop levels and time-decay deadline. Invariants:
/// `closed` implies `executed`; the executed/closed transitions are
/// idempotent (a duplicate fill notification is a no-op).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOrder {
    /// Unique, monotonically assigned id
    pub id: u64,
    /// Instrument identifier
    pub symbol: String,
    /// Trade direction
    pub side: Side,
    /// Position size
    pub lots: Decimal,
    /// When the record was created (may never reach the venue)
    pub created_time: DateTime<Utc>,
    /// Whether the venue confirmed the fill
    pub executed: bool,
    pub executed_time: Option<DateTime<Utc>>,
    pub executed_price: Option<Decimal>,
    /// Whether the flattening order was confirmed
    pub closed: bool,
    pub closed_time: Option<DateTime<Utc>>,
    pub closed_price: Option<Decimal>,
    /// Absolute stop-loss level, not re-derived after creation
    pub stop_loss: Option<Decimal>,
    /// Absolute take-profit level
    pub take_profit: Option<Decimal>,
    /// Forced-closure delay after execution, in seconds
    pub time_decay_secs: Option<i64>,
}

impl TradeOrder {
    /// Create a new order record.
    pub fn new(
        id: u64,
        symbol: impl Into<String>,
        side: Side,
        lots: Decimal,
        created_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            side,
            lots,
            created_time,
            executed: false,
            executed_time: None,
            executed_price: None,
            closed: false,
            closed_time: None,
            closed_price: None,
            stop_loss: None,
            take_profit: None,
            time_decay_secs: None,
        }
    }

    /// Set absolute stop levels.
    pub fn set_stops(&mut self, stop_loss: Decimal, take_profit: Decimal) {
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
    }

    /// Configure the time decay in seconds.
    pub fn set_time_decay(&mut self, secs: Option<i64>) {
        self.time_decay_secs = secs;
    }

    /// Record the venue fill. A second notification for the same order
    /// is a no-op, not a duplicate fill.
    pub fn set_executed(&mut self, time: DateTime<Utc>, price: Decimal) {
        if !self.executed {
            self.executed = true;
            self.executed_time = Some(time);
            self.executed_price = Some(price);
        }
    }

    /// Record the close confirmation. Idempotent like `set_executed`.
    pub fn set_closed(&mut self, time: DateTime<Utc>, price: Option<Decimal>) {
        if !self.closed {
            self.closed = true;
            self.closed_time = Some(time);
            self.closed_price = price;
        }
    }

    /// Whether the current price crossed the stop-loss or take-profit,
    /// direction-aware.
    pub fn stops_hit(&self, current_price: Decimal) -> bool {
        if let Some(sl) = self.stop_loss {
            let hit = match self.side {
                Side::Long => current_price <= sl,
                Side::Short => current_price >= sl,
            };
            if hit {
                return true;
            }
        }
        if let Some(tp) = self.take_profit {
            let hit = match self.side {
                Side::Long => current_price >= tp,
                Side::Short => current_price <= tp,
            };
            if hit {
                return true;
            }
        }
        false
    }

    /// Whether the time decay elapsed since execution. Always false for
    /// unexecuted orders or when no decay is configured.
    pub fn decay_elapsed(&self, now: DateTime<Utc>) -> bool {
        match (self.executed_time, self.time_decay_secs) {
            (Some(exec), Some(decay)) => now - exec >= Duration::seconds(decay),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(side: Side) -> TradeOrder {
        TradeOrder::new(1, "EURUSD", side, dec!(1), DateTime::from_timestamp(0, 0).unwrap())
    }

    #[test]
    fn test_executed_is_idempotent() {
        let mut o = order(Side::Long);
        let t1 = DateTime::from_timestamp(100, 0).unwrap();
        let t2 = DateTime::from_timestamp(200, 0).unwrap();

        o.set_executed(t1, dec!(1.1000));
        o.set_executed(t2, dec!(1.2000));

        assert!(o.executed);
        assert_eq!(o.executed_time, Some(t1));
        assert_eq!(o.executed_price, Some(dec!(1.1000)));
    }

    #[test]
    fn test_closed_is_idempotent() {
        let mut o = order(Side::Short);
        let t1 = DateTime::from_timestamp(100, 0).unwrap();
        o.set_closed(t1, Some(dec!(1.0950)));
        o.set_closed(DateTime::from_timestamp(200, 0).unwrap(), Some(dec!(1.0)));

        assert_eq!(o.closed_time, Some(t1));
        assert_eq!(o.closed_price, Some(dec!(1.0950)));
    }

    #[test]
    fn test_stops_hit_long() {
        let mut o = order(Side::Long);
        o.set_stops(dec!(1.0890), dec!(1.1110));

        assert!(!o.stops_hit(dec!(1.1000)));
        assert!(o.stops_hit(dec!(1.0890)));
        assert!(o.stops_hit(dec!(1.0800)));
        assert!(o.stops_hit(dec!(1.1110)));
    }

    #[test]
    fn test_stops_hit_short() {
        let mut o = order(Side::Short);
        o.set_stops(dec!(1.1110), dec!(1.0890));

        assert!(!o.stops_hit(dec!(1.1000)));
        assert!(o.stops_hit(dec!(1.1110)));
        assert!(o.stops_hit(dec!(1.0890)));
    }

    #[test]
    fn test_decay_requires_execution() {
        let mut o = order(Side::Long);
        o.set_time_decay(Some(60));
        let later = DateTime::from_timestamp(10_000, 0).unwrap();
        assert!(!o.decay_elapsed(later));

        o.set_executed(DateTime::from_timestamp(100, 0).unwrap(), dec!(1.1));
        assert!(!o.decay_elapsed(DateTime::from_timestamp(150, 0).unwrap()));
        assert!(o.decay_elapsed(DateTime::from_timestamp(160, 0).unwrap()));
    }
}
