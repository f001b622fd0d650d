//! Per-instrument signal engine.
//!
//! Ingests each new bar, keeps a reference distribution generated once per
//! session, and emits Long/Short/None signals under a set of anti-overtrading
//! throttles.

mod engine;

pub use engine::{SignalConfig, SignalEngine};
