//! Fade strategy controller.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use fade_core::error::{DataError, EngineError, EngineResult};
use fade_core::traits::{ExecutionVenue, SessionProfileBuilder};
use fade_core::types::{Bar, BarSeries, Side, Timeframe, TradeOrder};
use fade_indicators::{RollingStdDev, Sma};
use fade_orders::{PositionManager, TradingWindow};
use fade_risk::{calc_stops, LotSchedule, StopParams};
use fade_signals::{SignalConfig, SignalEngine};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Strategy parameters, assembled from configuration by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeParams {
    pub timeframe: Timeframe,
    pub ma_period: usize,
    pub stddev_period: usize,
    pub signals: SignalConfig,
    pub stops: StopParams,
    /// Forced-closure delay after execution; `None` disables time decay
    pub time_decay_secs: Option<i64>,
    /// Instrument tick size, required for `StopMode::Tick`
    pub tick_size: Option<Decimal>,
    /// Ordered entry sizes per side per session
    pub lot_schedule: Vec<Decimal>,
}

/// Per-instrument state: bar history, indicators, and the signal engine.
struct SymbolBook {
    series: BarSeries,
    sma: Sma,
    stddev: RollingStdDev,
    engine: SignalEngine,
    current_session: Option<NaiveDate>,
}

/// Drives the fade system for a set of instruments against one venue.
///
/// The controller is clocked entirely by incoming bars; it holds no timers.
/// Bars for all instruments must be fed in timestamp order so the shared
/// position manager sees a monotonic clock.
pub struct FadeStrategy {
    params: FadeParams,
    builder: Arc<dyn SessionProfileBuilder>,
    manager: PositionManager,
    books: HashMap<String, SymbolBook>,
    marks: HashMap<String, Decimal>,
    lots: LotSchedule,
    next_order_id: u64,
    /// Shared trading day across all instruments; the manager's daily
    /// state is reset exactly once per date change.
    current_session: Option<NaiveDate>,
}

impl FadeStrategy {
    pub fn new(
        params: FadeParams,
        builder: Arc<dyn SessionProfileBuilder>,
        venue: Arc<dyn ExecutionVenue>,
        window: TradingWindow,
    ) -> Self {
        let lots = LotSchedule::new(params.lot_schedule.clone());
        Self {
            params,
            builder,
            manager: PositionManager::new(venue, window),
            books: HashMap::new(),
            marks: HashMap::new(),
            lots,
            next_order_id: 1,
            current_session: None,
        }
    }

    pub fn manager(&self) -> &PositionManager {
        &self.manager
    }

    /// Process one bar for one instrument.
    pub async fn on_bar(&mut self, symbol: &str, bar: Bar) -> EngineResult<()> {
        let now = bar.datetime();
        let mark = Decimal::from_f64(bar.close).ok_or_else(|| {
            EngineError::Data(DataError::ParseError(format!(
                "non-finite close for {symbol}"
            )))
        })?;
        self.marks.insert(symbol.to_string(), mark);

        // The trading day is shared across instruments: the manager's daily
        // counters, spacing clock, and latches reset once per date change,
        // no matter which symbol's bar crosses it first.
        let date = bar.session_date();
        match self.current_session {
            None => self.current_session = Some(date),
            Some(prev) if prev != date => {
                info!(%prev, %date, "daily reset");
                self.manager.reset();
                self.current_session = Some(date);
            }
            Some(_) => {}
        }

        self.update_book(symbol, bar)?;

        // Protective exits run before any new entry is considered.
        self.manager.apply_close_conditions(now, &self.marks).await;

        if self.manager.flatten_due(now) {
            self.manager.close_all(now, &self.marks).await;
            return Ok(());
        }

        // Outside the order window the engine is not consulted at all, so a
        // break that could never be traded does not consume the signal
        // throttle state.
        if !self.manager.can_open(now) {
            return Ok(());
        }

        let book = self.books.get_mut(symbol).expect("book exists");
        let signal = book.engine.check_signal()?;
        let Some(side) = signal.side() else {
            return Ok(());
        };

        self.place_order(symbol, side, mark, now).await
    }

    /// Force-close every open position, e.g. at the end of a backtest run.
    pub async fn flatten_all(&mut self, now: DateTime<Utc>) {
        self.manager.close_all(now, &self.marks).await;
    }

    /// Update the per-symbol book: indicators, observation, and session
    /// rollover handling.
    fn update_book(&mut self, symbol: &str, bar: Bar) -> EngineResult<()> {
        let params = &self.params;
        let builder = &self.builder;
        let book = self.books.entry(symbol.to_string()).or_insert_with(|| {
            // Keep enough history to hand a full prior session to the
            // profile builder at rollover.
            let capacity = (2 * 86_400_000 / params.timeframe.millis()).max(100) as usize;
            SymbolBook {
                series: BarSeries::with_capacity(symbol.to_string(), params.timeframe, capacity),
                sma: Sma::new(params.ma_period),
                stddev: RollingStdDev::new(params.stddev_period),
                engine: SignalEngine::new(symbol, params.signals, Arc::clone(builder)),
                current_session: None,
            }
        });

        let sma = book.sma.update(bar.close);
        let std_dev = book.stddev.update(bar.close).unwrap_or(0.0);
        book.engine.observe(bar.datetime(), std_dev, &bar);
        debug!(%symbol, close = bar.close, ?sma, std_dev, "bar processed");

        let date = bar.session_date();
        match book.current_session {
            None => book.current_session = Some(date),
            Some(prev) if prev != date => {
                info!(%symbol, %prev, %date, "session rollover");
                book.engine.reset();

                let prior = book.series.session_bars(prev);
                if prior.is_empty() {
                    warn!(%symbol, %prev, "no bars for prior session; keeping old profile");
                } else {
                    book.engine.refresh_profile(&prior)?;
                }
                book.current_session = Some(date);
            }
            Some(_) => {}
        }

        book.series.push(bar);
        Ok(())
    }

    /// Size, protect, and submit one entry order.
    async fn place_order(
        &mut self,
        symbol: &str,
        side: Side,
        mark: Decimal,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let count = match side {
            Side::Long => self.manager.long_count(),
            Side::Short => self.manager.short_count(),
        };
        let Some(lots) = self.lots.size_for(count) else {
            debug!(%symbol, %side, count, "lot schedule exhausted");
            return Ok(());
        };

        let levels = calc_stops(mark, side, &self.params.stops, Some(lots), self.params.tick_size)?;

        let id = self.next_order_id;
        self.next_order_id += 1;
        let mut order = TradeOrder::new(id, symbol, side, lots, now);
        order.set_stops(levels.stop_loss, levels.take_profit);
        order.set_time_decay(self.params.time_decay_secs);

        if self.manager.open(order, now).await?.is_some() {
            self.manager.reconcile(symbol).await?;
        }
        Ok(())
    }
}
