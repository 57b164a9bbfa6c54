//! Ordered OHLCV series for one symbol.
//!
//! Bar index `i` is the alignment key shared by indicators, signals and the
//! equity curve.

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    /// Build a series, reversing newest-first input.
    ///
    /// Fails when `bars` is empty, when a price is not a finite positive
    /// number or a volume is negative or non-finite, or when, after the
    /// reversal, time is not strictly increasing.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<OhlcvBar>) -> Result<Self, StratbenchError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(StratbenchError::load(symbol, "series has no bars"));
        }

        for (i, bar) in bars.iter().enumerate() {
            if let Some(reason) = invalid_field(bar) {
                return Err(StratbenchError::load(
                    symbol,
                    format!("bar {} (time {}): {}", i, bar.time, reason),
                ));
            }
        }

        if bars[0].time > bars[bars.len() - 1].time {
            bars.reverse();
        }

        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                return Err(StratbenchError::load(
                    symbol,
                    format!(
                        "bar {} (time {}) is not after bar {} (time {})",
                        i + 1,
                        pair[1].time,
                        i,
                        pair[0].time
                    ),
                ));
            }
        }

        Ok(PriceSeries { symbol, bars })
    }

    /// Build a series from closing prices alone, indexed 0..n.
    pub fn from_closes(symbol: impl Into<String>, closes: &[f64]) -> Result<Self, StratbenchError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                time: i as i64,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn close(&self, index: usize) -> f64 {
        self.bars[index].close
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> &OhlcvBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &OhlcvBar {
        &self.bars[self.bars.len() - 1]
    }
}

fn invalid_field(bar: &OhlcvBar) -> Option<String> {
    let prices = [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
    ];
    if let Some((name, value)) = prices.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
        return Some(format!("{} must be a positive finite price, got {}", name, value));
    }
    if !(bar.volume.is_finite() && bar.volume >= 0.0) {
        return Some(format!("volume must be finite and non-negative, got {}", bar.volume));
    }
    None
}
