//! Core data types for the fade trading engine.

mod ohlcv;
mod profile;
mod signal;
mod timeframe;
mod trade;

pub use ohlcv::{Bar, BarSeries};
pub use profile::{LongMode, SessionProfile, ShortMode};
pub use signal::{Side, StopMode, TradeSignal};
pub use timeframe::Timeframe;
pub use trade::TradeOrder;
