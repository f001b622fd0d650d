//! Order and position lifecycle management.
//!
//! Owns the live and historical trade collections for one strategy
//! instance, applies time-of-day gating, daily counters, and inter-order
//! spacing, and drives opening/closing against the execution venue.

mod manager;
mod window;

pub use manager::PositionManager;
pub use window::TradingWindow;
