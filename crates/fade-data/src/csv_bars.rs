//! CSV bar loading.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use fade_core::error::DataError;
use fade_core::types::Bar;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Directory of per-symbol bar files, one `<SYMBOL>.csv` per instrument.
pub struct BarDirectory {
    dir: PathBuf,
}

impl BarDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load all bars for a symbol, sorted by timestamp.
    pub fn load_symbol(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.dir.join(format!("{symbol}.csv"));
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        load_bars(&path)
    }
}

/// Load intraday bars from a single CSV file, sorted by timestamp.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let timestamp = parse_timestamp(&record.date)?;
        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    if bars.is_empty() {
        return Err(DataError::NoDataAvailable);
    }
    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Parse intraday and daily timestamp formats, plus raw Unix values.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y%m%d %H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            let dt = d.and_hms_opt(0, 0, 0).unwrap();
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("2024-01-15T10:30:00").is_ok());
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("1705312800000").is_ok()); // Unix ms
        assert!(parse_timestamp("1705312800").is_ok()); // Unix sec
        assert!(parse_timestamp("not-a-date").is_err());
    }

    #[test]
    fn test_load_bars_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EURUSD.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,open,high,low,close,volume").unwrap();
        writeln!(file, "2024-01-15 10:05:00,1.1,1.2,1.0,1.15,100").unwrap();
        writeln!(file, "2024-01-15 10:00:00,1.0,1.1,0.9,1.1,50").unwrap();
        drop(file);

        let bars = BarDirectory::new(dir.path()).load_symbol("EURUSD").unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 1.1);
    }

    #[test]
    fn test_missing_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let err = BarDirectory::new(dir.path()).load_symbol("GBPUSD");
        assert!(matches!(err, Err(DataError::SymbolNotFound(_))));
    }
}
