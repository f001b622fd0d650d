//! Per-session lot sizing schedule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ordered sequence of position sizes consumed as same-side signals occur
/// within one session. The schedule length is the daily per-side order cap:
/// once exhausted, further signals on that side are suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotSchedule(Vec<Decimal>);

impl LotSchedule {
    pub fn new(sizes: Vec<Decimal>) -> Self {
        Self(sizes)
    }

    /// Lot size for the n-th same-side order of the day (0-based), or `None`
    /// when the schedule is exhausted.
    pub fn size_for(&self, orders_today: usize) -> Option<Decimal> {
        self.0.get(orders_today).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Decimal>> for LotSchedule {
    fn from(sizes: Vec<Decimal>) -> Self {
        Self::new(sizes)
    }
}
