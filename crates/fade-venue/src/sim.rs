//! Simulated execution venue for backtesting.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use fade_core::error::VenueError;
use fade_core::traits::{ExecutionVenue, VenueAck};
use fade_core::types::Side;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;
use uuid::Uuid;

/// In-memory venue that fills every market order immediately at the posted
/// mark price, with configurable slippage.
///
/// The driver posts the current close as the mark before each bar is
/// processed. Net open quantity per symbol is tracked so reconciliation
/// against local state can be exercised; `fail_next` injects a submission
/// failure for tests.
pub struct SimVenue {
    marks: Mutex<HashMap<String, Decimal>>,
    /// Net open lots per symbol: positive long, negative short
    net_lots: Mutex<HashMap<String, Decimal>>,
    slippage_pct: Decimal,
    fail_next: Mutex<bool>,
}

impl SimVenue {
    pub fn new() -> Self {
        Self {
            marks: Mutex::new(HashMap::new()),
            net_lots: Mutex::new(HashMap::new()),
            slippage_pct: Decimal::ZERO,
            fail_next: Mutex::new(false),
        }
    }

    /// Set slippage percentage applied against the mark.
    pub fn with_slippage(mut self, slippage_pct: Decimal) -> Self {
        self.slippage_pct = slippage_pct;
        self
    }

    /// Post the current mark price for a symbol.
    pub fn set_mark(&self, symbol: &str, price: Decimal) {
        self.marks.lock().unwrap().insert(symbol.to_string(), price);
    }

    /// Make the next submission fail, for exercising the recovery path.
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    /// Net open lots for a symbol (positive long, negative short).
    pub fn net_position(&self, symbol: &str) -> Decimal {
        self.net_lots
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn fill_price(&self, mark: Decimal, side: Side) -> Decimal {
        let slip = self.slippage_pct / dec!(100);
        match side {
            Side::Long => mark * (Decimal::ONE + slip),
            Side::Short => mark * (Decimal::ONE - slip),
        }
    }
}

impl Default for SimVenue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionVenue for SimVenue {
    async fn submit_market(
        &self,
        symbol: &str,
        side: Side,
        lots: Decimal,
    ) -> Result<VenueAck, VenueError> {
        {
            let mut fail = self.fail_next.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(VenueError::Submission("injected failure".to_string()));
            }
        }

        let mark = self
            .marks
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| VenueError::Submission(format!("no mark for {symbol}")))?;

        let price = self.fill_price(mark, side);
        let signed = match side {
            Side::Long => lots,
            Side::Short => -lots,
        };
        *self
            .net_lots
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_insert(Decimal::ZERO) += signed;

        debug!(%symbol, %side, %lots, %price, "sim fill");
        Ok(VenueAck {
            order_ref: Uuid::new_v4().to_string(),
            fill_price: Some(price),
            fill_time: Some(Utc::now()),
        })
    }

    async fn reported_lots(&self, symbol: &str) -> Result<Option<Decimal>, VenueError> {
        Ok(Some(self.net_position(symbol)))
    }

    fn name(&self) -> &str {
        "Sim Venue"
    }
}
