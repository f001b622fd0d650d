//! Default session-profile builder.
//!
//! Buckets each bar's typical price into tick-sized bins weighted by volume,
//! finds the point of control, and expands around it until the configured
//! fraction of traded volume is covered. The band bounds become VAL/VAH;
//! the opening range is taken from a configurable early window.

mod volume_profile;

pub use volume_profile::{VolumeProfileBuilder, VolumeProfileParams};
