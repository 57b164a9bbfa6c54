#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use stratbench::domain::error::StratbenchError;
pub use stratbench::domain::ohlcv::OhlcvBar;
use stratbench::domain::price_series::PriceSeries;
use stratbench::ports::data_port::DataPort;

/// 2024-01-01T00:00:00Z
pub const START_TIME: i64 = 1_704_067_200;
pub const DAY: i64 = 86_400;

pub struct MockDataPort {
    pub bars: Vec<OhlcvBar>,
    pub symbol: String,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        Self {
            bars,
            symbol: symbol.to_string(),
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            symbol: "FAIL".to_string(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self) -> Result<PriceSeries, StratbenchError> {
        if let Some(reason) = &self.error {
            return Err(StratbenchError::Load {
                source_name: self.symbol.clone(),
                reason: reason.clone(),
            });
        }
        PriceSeries::new(self.symbol.clone(), self.bars.clone())
    }
}

pub fn make_bar(day: i64, close: f64) -> OhlcvBar {
    OhlcvBar {
        time: START_TIME + day * DAY,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1_000.0,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i as i64, c))
        .collect()
}

/// Deterministic oscillating price path with a mild uptrend, long enough
/// for every default strategy to leave warm-up.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + (t * 0.11).sin() * 12.0 + (t * 0.37).cos() * 4.0 + t * 0.03
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new("TEST", bars_from_closes(closes)).unwrap()
}

pub fn plain_csv(closes: &[f64]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars_from_closes(closes) {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.time, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    out
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}
