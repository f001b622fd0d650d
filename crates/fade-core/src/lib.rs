//! Core types and traits for the fade trading engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Trade order records and session profiles
//! - Signal and stop-mode enumerations
//! - Traits for the execution venue and profile construction

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use traits::*;
pub use types::*;
