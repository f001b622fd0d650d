//! Execution venue implementations.
//!
//! The engine only ever talks to the [`fade_core::traits::ExecutionVenue`]
//! trait; this crate provides the in-memory venue used by backtests and
//! tests.

mod sim;

pub use sim::SimVenue;
