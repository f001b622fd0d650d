//! Stop calculation and lot sizing.

mod lots;
mod stops;

pub use lots::LotSchedule;
pub use stops::{calc_stops, StopLevels, StopParams};
