//! Error types for the fade trading engine.
//!
//! Configuration and calculation errors (`StopError`, `SignalError::ModeUnset`)
//! indicate a bug or misconfiguration and propagate; venue errors are
//! recoverable at the position-manager boundary (no order is created, the
//! caller may retry on a later bar).

use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Stop calculation error: {0}")]
    Stop(#[from] StopError),

    #[error("Venue error: {0}")]
    Venue(#[from] VenueError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Signal-engine errors.
///
/// "No session profile yet" is not an error (the engine returns a `None`
/// signal); `ModeUnset` means a profile exists but no trade mode was derived,
/// which callers must prevent by running the profile refresh first.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("trade mode not assigned for {symbol}; profile refresh must run first")]
    ModeUnset { symbol: String },

    #[error("invalid signal configuration: {0}")]
    InvalidConfig(String),
}

/// Stop-level calculation errors.
#[derive(Error, Debug)]
pub enum StopError {
    #[error("{mode} stop mode requires {param}")]
    MissingParameter {
        mode: &'static str,
        param: &'static str,
    },
}

/// Execution-venue errors.
#[derive(Error, Debug)]
pub enum VenueError {
    #[error("order submission failed: {0}")]
    Submission(String),

    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("position not found: {0}")]
    PositionNotFound(String),

    #[error("venue connection error: {0}")]
    Connection(String),
}

/// Market-data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("no data available for the requested range")]
    NoDataAvailable,

    #[error("parse error: {0}")]
    ParseError(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
