//! Trait definitions for external collaborators.

mod profile_builder;
mod venue;

pub use profile_builder::SessionProfileBuilder;
pub use venue::{ExecutionVenue, VenueAck};
