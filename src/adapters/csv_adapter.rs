//! CSV file data adapter.
//!
//! Reads either a plain `timestamp,open,high,low,close,volume` file or the
//! exchange-export layout `unix,date,symbol,open,high,low,close,volume_base
//! [,volume_quote]`, which usually carries a one-line source URL above the
//! header.

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;

const MIN_HEADER_FIELDS: usize = 6;
/// Integer timestamps above this are milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub struct CsvAdapter {
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Plain,
    Extended,
}

#[derive(Debug)]
struct Columns {
    layout: Layout,
    time: usize,
    symbol: Option<usize>,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, String> {
        let names: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let Some(symbol) = find("symbol") else {
            return Ok(Columns {
                layout: Layout::Plain,
                time: 0,
                symbol: None,
                open: 1,
                high: 2,
                low: 3,
                close: 4,
                volume: 5,
            });
        };

        let require = |name: &str| find(name).ok_or_else(|| format!("missing column '{}'", name));
        Ok(Columns {
            layout: Layout::Extended,
            time: find("unix").or_else(|| find("timestamp")).unwrap_or(0),
            symbol: Some(symbol),
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: names
                .iter()
                .position(|n| n.starts_with("volume"))
                .ok_or_else(|| "missing column 'volume'".to_string())?,
        })
    }

    fn width(&self) -> usize {
        [
            self.time,
            self.symbol.unwrap_or(0),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

impl CsvAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    fn parse_bar(
        &self,
        record: &StringRecord,
        columns: &Columns,
        line: u64,
    ) -> Result<OhlcvBar, StratbenchError> {
        let raw_time = self.field(record, columns.time, "timestamp", line)?;
        let time = parse_timestamp(raw_time).ok_or_else(|| {
            StratbenchError::load(
                self.source_name(),
                format!("line {}: invalid timestamp '{}'", line, raw_time),
            )
        })?;

        Ok(OhlcvBar {
            time,
            open: self.number(record, columns.open, "open", line)?,
            high: self.number(record, columns.high, "high", line)?,
            low: self.number(record, columns.low, "low", line)?,
            close: self.number(record, columns.close, "close", line)?,
            volume: self.number(record, columns.volume, "volume", line)?,
        })
    }

    fn field<'r>(
        &self,
        record: &'r StringRecord,
        index: usize,
        name: &str,
        line: u64,
    ) -> Result<&'r str, StratbenchError> {
        record.get(index).ok_or_else(|| {
            StratbenchError::load(
                self.source_name(),
                format!("line {}: missing {} value", line, name),
            )
        })
    }

    fn number(
        &self,
        record: &StringRecord,
        index: usize,
        name: &str,
        line: u64,
    ) -> Result<f64, StratbenchError> {
        let raw = self.field(record, index, name, line)?;
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(StratbenchError::load(
                self.source_name(),
                format!("line {}: invalid {} value '{}'", line, name, raw),
            )),
        }
    }
}

/// Unix seconds from an integer (seconds or milliseconds) or a UTC date
/// string.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(if value > MILLIS_THRESHOLD {
            value / 1000
        } else {
            value
        });
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// A plain-layout record whose time and price fields all parse is data, not
/// a header.
fn is_data_row(record: &StringRecord) -> bool {
    record.get(0).and_then(parse_timestamp).is_some()
        && (1..MIN_HEADER_FIELDS).all(|i| record.get(i).is_some_and(|f| f.parse::<f64>().is_ok()))
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self) -> Result<PriceSeries, StratbenchError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.path)
            .map_err(|e| StratbenchError::load(self.source_name(), e.to_string()))?;

        let mut columns: Option<Columns> = None;
        let mut symbol: Option<String> = None;
        let mut bars = Vec::new();

        for result in reader.records() {
            let record =
                result.map_err(|e| StratbenchError::load(self.source_name(), e.to_string()))?;
            let line = record.position().map_or(0, |p| p.line());
            if record.iter().all(|f| f.is_empty()) {
                continue;
            }

            if columns.is_none() {
                if record.len() < MIN_HEADER_FIELDS {
                    continue;
                }
                let parsed = Columns::from_header(&record)
                    .map_err(|reason| StratbenchError::load(self.source_name(), reason))?;
                // A plain file may start straight with data.
                let headerless = parsed.layout == Layout::Plain && is_data_row(&record);
                debug!(
                    path = %self.path.display(),
                    layout = ?parsed.layout,
                    headerless,
                    "csv layout detected"
                );
                columns = Some(parsed);
                if !headerless {
                    continue;
                }
            }
            let Some(cols) = &columns else {
                continue;
            };

            if record.len() < cols.width() {
                return Err(StratbenchError::load(
                    self.source_name(),
                    format!(
                        "line {}: expected {} fields, found {}",
                        line,
                        cols.width(),
                        record.len()
                    ),
                ));
            }
            if symbol.is_none() {
                symbol = cols
                    .symbol
                    .and_then(|i| record.get(i))
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
            }
            bars.push(self.parse_bar(&record, cols, line)?);
        }

        if columns.is_none() {
            return Err(StratbenchError::load(self.source_name(), "no header row found"));
        }
        if bars.is_empty() {
            return Err(StratbenchError::load(self.source_name(), "no data rows"));
        }

        let symbol = symbol.unwrap_or_else(|| self.file_stem());
        let series = PriceSeries::new(symbol, bars)?;
        info!(
            path = %self.path.display(),
            symbol = series.symbol(),
            bars = series.len(),
            "price series loaded"
        );
        Ok(series)
    }
}
