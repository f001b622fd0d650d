//! Config validation command.

use anyhow::{Context, Result};
use fade_core::types::StopMode;
use std::path::Path;
use tracing::warn;

pub async fn run(config_path: &Path) -> Result<()> {
    let cfg = fade_config::load_config(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let signals = fade_signals::SignalConfig {
        std_threshold: cfg.signals.std_threshold,
        min_price_change: cfg.signals.min_price_change,
        min_signal_interval_secs: cfg.signals.min_signal_interval_secs,
    };
    signals.validate().context("Invalid [signals] section")?;

    if cfg.trading.symbols.is_empty() {
        anyhow::bail!("[trading].symbols is empty");
    }
    if cfg.trading.lot_schedule.is_empty() {
        warn!("[trading].lot_schedule is empty; no orders will ever be placed");
    }
    if cfg.stops.mode == StopMode::Tick && cfg.profile.tick_size <= 0.0 {
        anyhow::bail!("tick stop mode requires a positive [profile].tick_size");
    }
    if cfg.profile.value_area <= 0.0 || cfg.profile.value_area > 1.0 {
        anyhow::bail!("[profile].value_area must be in (0, 1]");
    }

    println!("Configuration OK: {}", config_path.display());
    Ok(())
}
