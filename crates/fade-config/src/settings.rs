//! Configuration structures.

use chrono::NaiveTime;
use fade_core::types::StopMode;
use fade_orders::TradingWindow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub trading: TradingSettings,
    #[serde(default)]
    pub signals: SignalSettings,
    #[serde(default)]
    pub profile: ProfileSettings,
    #[serde(default)]
    pub stops: StopSettings,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "fade-engine".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Instruments and per-entry sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSettings {
    pub symbols: Vec<String>,
    /// Ordered sizes for the 1st, 2nd, ... entry per side per session.
    /// An empty schedule disables entries entirely.
    pub lot_schedule: Vec<Decimal>,
}

impl Default for TradingSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            symbols: vec!["EURUSD".to_string()],
            lot_schedule: vec![dec!(1), dec!(1), dec!(2)],
        }
    }
}

/// Signal engine thresholds and indicator periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSettings {
    pub ma_period: usize,
    pub stddev_period: usize,
    pub std_threshold: f64,
    pub min_price_change: f64,
    pub min_signal_interval_secs: i64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            ma_period: 20,
            stddev_period: 20,
            std_threshold: 0.0001,
            min_price_change: 0.0005,
            min_signal_interval_secs: 300,
        }
    }
}

/// Session profile construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub tick_size: f64,
    /// Fraction of traded volume the value area must cover
    pub value_area: f64,
    pub opening_range_minutes: i64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            tick_size: 0.0002,
            value_area: 0.7,
            opening_range_minutes: 60,
        }
    }
}

/// Protective stop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopSettings {
    pub mode: StopMode,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    /// Seconds after execution at which a position is closed regardless of
    /// price. `None` disables time decay.
    pub time_decay_secs: Option<i64>,
}

impl Default for StopSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            mode: StopMode::Percent,
            stop_loss: dec!(1),
            take_profit: dec!(1),
            time_decay_secs: None,
        }
    }
}

/// Time-of-day trading window.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WindowSettings {
    pub start_time: Option<NaiveTime>,
    pub cutoff_time: Option<NaiveTime>,
    pub flatten_time: Option<NaiveTime>,
    pub min_spacing_secs: Option<i64>,
}

impl WindowSettings {
    pub fn to_window(&self) -> TradingWindow {
        TradingWindow {
            start_time: self.start_time,
            cutoff_time: self.cutoff_time,
            flatten_time: self.flatten_time,
            min_spacing_secs: self.min_spacing_secs,
        }
    }
}

/// Backtest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSettings {
    pub data_dir: String,
    pub history_csv: Option<String>,
    pub slippage_pct: Decimal,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            data_dir: "data".to_string(),
            history_csv: None,
            slippage_pct: dec!(0.05),
        }
    }
}
