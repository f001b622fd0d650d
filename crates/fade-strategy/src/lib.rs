//! Market-profile fade strategy.
//!
//! One controller instance drives any number of instruments against a
//! single execution venue: per-symbol signal books feed a shared position
//! manager, with session rollover, forced flattening, and protective stop
//! handling applied on every bar.

mod fade;

pub use fade::{FadeParams, FadeStrategy};
