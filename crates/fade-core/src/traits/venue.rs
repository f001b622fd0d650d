//! Execution venue trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::VenueError;
use crate::types::{Side, TradeOrder};

/// Acknowledgement returned by the venue for a submitted order.
///
/// Backtest venues fill immediately and report the price; a live venue may
/// acknowledge without a fill, which arrives later through reconciliation.
#[derive(Debug, Clone)]
pub struct VenueAck {
    /// Venue-side reference for the order
    pub order_ref: String,
    pub fill_price: Option<Decimal>,
    pub fill_time: Option<DateTime<Utc>>,
}

/// Trait for the external execution venue.
///
/// The engine treats every call as a blocking request/acknowledge exchange:
/// each is awaited to completion before the next bar is processed. Retry and
/// timeout policy belong to the implementation, not the engine.
#[async_trait]
pub trait ExecutionVenue: Send + Sync {
    /// Submit a market order.
    async fn submit_market(
        &self,
        symbol: &str,
        side: Side,
        lots: Decimal,
    ) -> Result<VenueAck, VenueError>;

    /// Submit the opposite-direction market order that flattens `order`.
    async fn submit_opposite(&self, order: &TradeOrder) -> Result<VenueAck, VenueError> {
        self.submit_market(&order.symbol, order.side.opposite(), order.lots)
            .await
    }

    /// Venue-reported open quantity for a symbol, used to cross-check local
    /// state. The default no-op capability returns `None`, meaning the venue
    /// offers no position reporting and local flags are authoritative.
    async fn reported_lots(&self, _symbol: &str) -> Result<Option<Decimal>, VenueError> {
        Ok(None)
    }

    /// Venue name for logging.
    fn name(&self) -> &str;
}
