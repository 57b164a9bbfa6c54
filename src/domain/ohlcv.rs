//! OHLCV bar representation.

use chrono::{DateTime, NaiveDateTime};

/// Times below this are treated as sequence indices rather than unix seconds.
const MIN_UNIX_TIME: i64 = 100_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    /// Unix seconds, or a plain sequence index for synthetic data.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Wall-clock time of the bar, if `time` looks like unix seconds.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        if self.time < MIN_UNIX_TIME {
            return None;
        }
        DateTime::from_timestamp(self.time, 0).map(|dt| dt.naive_utc())
    }

    /// Human-readable time: `YYYY-MM-DD` for midnight bars, full timestamp
    /// otherwise, and the raw ordinal for sequence-indexed bars.
    pub fn time_label(&self) -> String {
        match self.datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.date().to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.time.to_string(),
        }
    }
}
