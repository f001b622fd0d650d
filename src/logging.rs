//! Logging setup.

use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global subscriber.
///
/// `format` is one of `pretty`, `compact`, or `json`; logging to a file
/// disables ANSI colors. The `RUST_LOG` environment variable overrides
/// `level` when set.
pub fn setup_logging(level: &str, format: &str, file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(file);
            match format {
                "json" => registry.with(layer.json()).init(),
                "compact" => registry.with(layer.compact()).init(),
                _ => registry.with(layer).init(),
            }
        }
        None => match format {
            "json" => registry.with(fmt::layer().json()).init(),
            "compact" => registry.with(fmt::layer().compact()).init(),
            _ => registry.with(fmt::layer().pretty()).init(),
        },
    }
    Ok(())
}
