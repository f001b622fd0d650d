//! Position manager.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fade_core::error::{EngineError, EngineResult, VenueError};
use fade_core::traits::ExecutionVenue;
use fade_core::types::{Side, TradeOrder};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::window::TradingWindow;

/// Owns the set of trades for one strategy instance.
///
/// Live orders move to the append-only history only through a completed
/// close; they are never abandoned in place. Daily counters and the three
/// window latches are cleared by `reset` at session rollover, but live
/// orders and history persist across sessions until individually closed.
pub struct PositionManager {
    venue: Arc<dyn ExecutionVenue>,
    window: TradingWindow,

    live: HashMap<u64, TradeOrder>,
    history: Vec<TradeOrder>,

    long_count: usize,
    short_count: usize,
    last_order_time: Option<DateTime<Utc>>,

    // Each latch flips at most once per session.
    window_opened: bool,
    window_closed: bool,
    flattened: bool,
}

impl PositionManager {
    pub fn new(venue: Arc<dyn ExecutionVenue>, window: TradingWindow) -> Self {
        Self {
            venue,
            window,
            live: HashMap::new(),
            history: Vec::new(),
            long_count: 0,
            short_count: 0,
            last_order_time: None,
            window_opened: false,
            window_closed: false,
            flattened: false,
        }
    }

    pub fn long_count(&self) -> usize {
        self.long_count
    }

    pub fn short_count(&self) -> usize {
        self.short_count
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live(&self) -> impl Iterator<Item = &TradeOrder> {
        self.live.values()
    }

    pub fn history(&self) -> &[TradeOrder] {
        &self.history
    }

    pub fn flattened(&self) -> bool {
        self.flattened
    }

    /// Composite open gate: within the trading window and the inter-order
    /// spacing is satisfied. Crossing the start time latches the window
    /// open for the session; crossing the cutoff latches it closed.
    pub fn can_open(&mut self, now: DateTime<Utc>) -> bool {
        self.window_started(now)
            && !self.window_ended(now)
            && !self.past_flatten_time(now)
            && self.spacing_elapsed(now)
    }

    /// Whether the forced-flatten deadline has been reached and the session
    /// has not been flattened yet.
    pub fn flatten_due(&self, now: DateTime<Utc>) -> bool {
        self.past_flatten_time(now) && !self.flattened
    }

    /// Submit a new order to the venue and start tracking it.
    ///
    /// Returns `Ok(None)` without side effects when the open gate blocks.
    /// A venue failure is surfaced to the caller and the order is not
    /// tracked; the caller may retry on a later bar.
    pub async fn open(
        &mut self,
        mut order: TradeOrder,
        now: DateTime<Utc>,
    ) -> Result<Option<u64>, VenueError> {
        if !self.can_open(now) {
            info!(id = order.id, symbol = %order.symbol, "order rejected: open gate closed");
            return Ok(None);
        }

        let ack = self
            .venue
            .submit_market(&order.symbol, order.side, order.lots)
            .await?;

        if let Some(price) = ack.fill_price {
            order.set_executed(ack.fill_time.unwrap_or(now), price);
        }

        let id = order.id;
        match order.side {
            Side::Long => self.long_count += 1,
            Side::Short => self.short_count += 1,
        }
        self.last_order_time = Some(now);
        info!(id, symbol = %order.symbol, side = %order.side, lots = %order.lots, "order opened");
        self.live.insert(id, order);
        Ok(Some(id))
    }

    /// Record a venue fill notification for a live order. Idempotent; an
    /// unknown id is logged and ignored.
    pub fn record_fill(&mut self, id: u64, time: DateTime<Utc>, price: Decimal) {
        match self.live.get_mut(&id) {
            Some(order) => order.set_executed(time, price),
            None => warn!(id, "fill notification for unknown order"),
        }
    }

    /// Close every live order whose stop level was crossed or whose time
    /// decay elapsed. A venue failure leaves the order live for a retry on
    /// a later bar. Returns the ids moved to history.
    pub async fn apply_close_conditions(
        &mut self,
        now: DateTime<Utc>,
        marks: &HashMap<String, Decimal>,
    ) -> Vec<u64> {
        let due: Vec<u64> = self
            .live
            .values()
            .filter(|o| {
                o.executed
                    && (o.decay_elapsed(now)
                        || marks
                            .get(&o.symbol)
                            .is_some_and(|price| o.stops_hit(*price)))
            })
            .map(|o| o.id)
            .collect();

        let mut closed = Vec::new();
        for id in due {
            if self.close_order(id, now, marks).await {
                closed.push(id);
            }
        }
        closed
    }

    /// Force-close every live position regardless of stops or decay.
    ///
    /// Latched: a second call in the same session is a no-op even when
    /// invoked again before rollover.
    pub async fn close_all(
        &mut self,
        now: DateTime<Utc>,
        marks: &HashMap<String, Decimal>,
    ) -> Vec<u64> {
        if self.flattened {
            return Vec::new();
        }
        self.flattened = true;

        let ids: Vec<u64> = self.live.keys().copied().collect();
        info!(count = ids.len(), "flattening all open positions");

        let mut closed = Vec::new();
        for id in ids {
            if self.close_order(id, now, marks).await {
                closed.push(id);
            }
        }
        closed
    }

    /// Submit the flattening order for one live position and move it to
    /// history. Already-closed or unknown ids are a no-op. Returns whether
    /// the order reached history.
    async fn close_order(
        &mut self,
        id: u64,
        now: DateTime<Utc>,
        marks: &HashMap<String, Decimal>,
    ) -> bool {
        let Some(order) = self.live.get(&id) else {
            return false;
        };
        if order.closed {
            // Close against an already-closed position is a no-op.
            return false;
        }
        if !order.executed {
            warn!(id, symbol = %order.symbol, "skipping close of unfilled order");
            return false;
        }

        match self.venue.submit_opposite(order).await {
            Ok(ack) => {
                let mut order = self.live.remove(&id).expect("order is live");
                let price = ack.fill_price.or_else(|| marks.get(&order.symbol).copied());
                order.set_closed(ack.fill_time.unwrap_or(now), price);
                debug!(id, symbol = %order.symbol, "position closed");
                self.history.push(order);
                true
            }
            Err(err) => {
                warn!(id, %err, "close submission failed; will retry");
                false
            }
        }
    }

    /// Zero the daily counters, spacing clock, and window latches at
    /// session rollover. Live orders and history are left untouched.
    pub fn reset(&mut self) {
        self.long_count = 0;
        self.short_count = 0;
        self.last_order_time = None;
        self.window_opened = false;
        self.window_closed = false;
        self.flattened = false;
    }

    /// Cross-check local open quantity against the venue-reported position.
    ///
    /// Returns `Ok(None)` when the venue offers no position reporting (local
    /// flags are authoritative), otherwise whether the two agreed. A
    /// mismatch is logged but never halts trading.
    pub async fn reconcile(&self, symbol: &str) -> EngineResult<Option<bool>> {
        let Some(reported) = self.venue.reported_lots(symbol).await? else {
            return Ok(None);
        };

        let local: Decimal = self
            .live
            .values()
            .filter(|o| o.symbol == symbol && o.executed && !o.closed)
            .map(|o| match o.side {
                Side::Long => o.lots,
                Side::Short => -o.lots,
            })
            .sum();

        if local != reported {
            warn!(%symbol, %local, %reported, "position mismatch against venue");
            return Ok(Some(false));
        }
        Ok(Some(true))
    }

    /// Snapshot the history collection as CSV, once per run termination.
    pub fn export_history_csv<W: Write>(&self, writer: W) -> EngineResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for order in &self.history {
            csv.serialize(order)
                .map_err(|e| EngineError::Serialization(e.to_string()))?;
        }
        csv.flush()?;
        Ok(())
    }

    fn window_started(&mut self, now: DateTime<Utc>) -> bool {
        if self.window_opened {
            return true;
        }
        let started = match self.window.start_time {
            None => true,
            Some(start) => now.time() >= start,
        };
        if started {
            self.window_opened = true;
        }
        started
    }

    fn window_ended(&mut self, now: DateTime<Utc>) -> bool {
        if self.window_closed {
            return true;
        }
        if let Some(cutoff) = self.window.cutoff_time {
            if now.time() >= cutoff {
                self.window_closed = true;
                return true;
            }
        }
        false
    }

    fn past_flatten_time(&self, now: DateTime<Utc>) -> bool {
        self.window
            .flatten_time
            .is_some_and(|t| now.time() >= t)
    }

    /// Spacing is measured from the last successfully submitted order;
    /// a venue rejection does not advance the clock.
    fn spacing_elapsed(&self, now: DateTime<Utc>) -> bool {
        match (self.last_order_time, self.window.min_spacing_secs) {
            (Some(last), Some(spacing)) => now - last >= Duration::seconds(spacing),
            _ => true,
        }
    }
}
