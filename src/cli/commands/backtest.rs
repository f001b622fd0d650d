//! Backtest command implementation.

use anyhow::{Context, Result};
use fade_config::AppConfig;
use fade_core::types::{Bar, Side, Timeframe};
use fade_data::BarDirectory;
use fade_profile::{VolumeProfileBuilder, VolumeProfileParams};
use fade_strategy::{FadeParams, FadeStrategy};
use fade_venue::SimVenue;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::cli::BacktestArgs;

pub async fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    let cfg = fade_config::load_config(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let symbols = if args.symbols.is_empty() {
        cfg.trading.symbols.clone()
    } else {
        args.symbols.clone()
    };
    if symbols.is_empty() {
        anyhow::bail!("No symbols configured; set [trading].symbols or pass --symbols");
    }

    let timeframe = parse_timeframe(&args.timeframe)?;
    let data_dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.backtest.data_dir));

    info!(symbols = ?symbols, data_dir = %data_dir.display(), "starting backtest");
    let events = load_events(&data_dir, &symbols)?;

    let venue = Arc::new(SimVenue::new().with_slippage(cfg.backtest.slippage_pct));
    let builder = Arc::new(VolumeProfileBuilder::new(VolumeProfileParams {
        tick_size: cfg.profile.tick_size,
        value_area: cfg.profile.value_area,
        opening_range_minutes: cfg.profile.opening_range_minutes,
    }));
    let mut strategy = FadeStrategy::new(
        strategy_params(&cfg, timeframe),
        builder,
        venue.clone(),
        cfg.window.to_window(),
    );

    let mut last_time = None;
    for (symbol, bar) in &events {
        if let Some(mark) = Decimal::from_f64(bar.close) {
            venue.set_mark(symbol, mark);
        }
        strategy.on_bar(symbol, *bar).await?;
        last_time = Some(bar.datetime());
    }

    // Anything still open at the end of the data is flattened at the last
    // observed price.
    if let Some(end) = last_time {
        strategy.flatten_all(end).await;
    }

    let summary = RunSummary::from_strategy(&strategy);
    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print!("{summary}"),
    }

    let export = args
        .export
        .clone()
        .or_else(|| cfg.backtest.history_csv.as_ref().map(PathBuf::from));
    if let Some(path) = export {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        strategy.manager().export_history_csv(file)?;
        info!("Trade history saved to {}", path.display());
    }

    Ok(())
}

fn strategy_params(cfg: &AppConfig, timeframe: Timeframe) -> FadeParams {
    FadeParams {
        timeframe,
        ma_period: cfg.signals.ma_period,
        stddev_period: cfg.signals.stddev_period,
        signals: fade_signals::SignalConfig {
            std_threshold: cfg.signals.std_threshold,
            min_price_change: cfg.signals.min_price_change,
            min_signal_interval_secs: cfg.signals.min_signal_interval_secs,
        },
        stops: fade_risk::StopParams {
            stop_loss: cfg.stops.stop_loss,
            take_profit: cfg.stops.take_profit,
            mode: cfg.stops.mode,
        },
        time_decay_secs: cfg.stops.time_decay_secs,
        tick_size: Decimal::from_f64(cfg.profile.tick_size),
        lot_schedule: cfg.trading.lot_schedule.clone(),
    }
}

/// Load all symbols and merge their bars into one timestamp-ordered stream.
fn load_events(data_dir: &Path, symbols: &[String]) -> Result<Vec<(String, Bar)>> {
    let dir = BarDirectory::new(data_dir);
    let mut events = Vec::new();
    for symbol in symbols {
        let bars = dir
            .load_symbol(symbol)
            .with_context(|| format!("Failed to load bars for {symbol}"))?;
        info!(%symbol, bars = bars.len(), "loaded history");
        events.extend(bars.into_iter().map(|b| (symbol.clone(), b)));
    }
    events.sort_by_key(|(_, b)| b.timestamp);
    Ok(events)
}

fn parse_timeframe(s: &str) -> Result<Timeframe> {
    match s {
        "1m" => Ok(Timeframe::Min1),
        "5m" => Ok(Timeframe::Min5),
        "15m" => Ok(Timeframe::Min15),
        "1h" => Ok(Timeframe::Hour1),
        "1d" => Ok(Timeframe::Daily),
        other => anyhow::bail!("Unknown timeframe '{other}' (expected 1m, 5m, 15m, 1h, 1d)"),
    }
}

#[derive(Serialize)]
struct RunSummary {
    closed_trades: usize,
    long_trades: usize,
    short_trades: usize,
    still_open: usize,
    realized_pnl: Decimal,
}

impl RunSummary {
    fn from_strategy(strategy: &FadeStrategy) -> Self {
        let history = strategy.manager().history();
        let longs = history.iter().filter(|o| o.side == Side::Long).count();

        let mut pnl = Decimal::ZERO;
        for order in history {
            if let (Some(entry), Some(exit)) = (order.executed_price, order.closed_price) {
                pnl += match order.side {
                    Side::Long => (exit - entry) * order.lots,
                    Side::Short => (entry - exit) * order.lots,
                };
            }
        }

        Self {
            closed_trades: history.len(),
            long_trades: longs,
            short_trades: history.len() - longs,
            still_open: strategy.manager().live_count(),
            realized_pnl: pnl,
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Backtest complete")?;
        writeln!(
            f,
            "  closed trades: {} ({} long / {} short)",
            self.closed_trades, self.long_trades, self.short_trades
        )?;
        writeln!(f, "  still open:    {}", self.still_open)?;
        writeln!(f, "  realized pnl:  {}", self.realized_pnl)
    }
}
