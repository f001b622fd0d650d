//! Historical bar loading.

mod csv_bars;

pub use csv_bars::{load_bars, BarDirectory};
