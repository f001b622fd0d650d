//! Rolling indicators for the bar-driven strategy loop.
//!
//! Unlike batch indicators these are incremental: one value in, at most one
//! value out, suitable for a loop that processes each bar to completion.

mod moving_average;
mod volatility;

pub use moving_average::Sma;
pub use volatility::RollingStdDev;
