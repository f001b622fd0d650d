//! Session profile construction collaborator.

use crate::error::DataError;
use crate::types::{Bar, SessionProfile};

/// Builds the reference distribution from a completed session's bars.
///
/// The numerical construction is treated as a collaborator behind this
/// trait: given the session's OHLCV series it returns the value-area band
/// and the opening-range band. Implementations must be pure.
pub trait SessionProfileBuilder: Send + Sync {
    /// Build a profile from one session's bars, oldest first.
    ///
    /// # Errors
    /// `DataError::NoDataAvailable` when `bars` is empty.
    fn build(&self, bars: &[Bar]) -> Result<SessionProfile, DataError>;
}
