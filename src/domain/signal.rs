//! Discrete per-bar trade signals and the generator capability.

use std::fmt;

use crate::domain::indicator::{IndicatorProvider, IndicatorType};
use crate::domain::price_series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Signal {
    Sell = -1,
    #[default]
    Hold = 0,
    Buy = 1,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
            Signal::Buy => write!(f, "BUY"),
        }
    }
}

/// Output of a signal generator.
///
/// `missing` lists required indicators that were not computed; when it is
/// non-empty, `signals` is all `Hold`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSignals {
    pub signals: Vec<Signal>,
    pub missing: Vec<IndicatorType>,
}

impl GeneratedSignals {
    pub fn all_hold(len: usize, missing: Vec<IndicatorType>) -> Self {
        GeneratedSignals {
            signals: vec![Signal::Hold; len],
            missing,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn count(&self, signal: Signal) -> usize {
        self.signals.iter().filter(|&&s| s == signal).count()
    }
}

/// A strategy that turns a price series and its indicators into signals.
pub trait SignalGenerator {
    fn name(&self) -> String;

    /// Indicators that must be computed before `generate_signals`.
    fn required_indicators(&self) -> Vec<IndicatorType>;

    /// Last bar index that is always `Hold` for lack of history.
    fn warmup(&self) -> usize;

    fn generate_signals(
        &self,
        series: &PriceSeries,
        indicators: &dyn IndicatorProvider,
    ) -> GeneratedSignals;
}

/// Upward cross of `level`: `prev <= level` and `cur > level`.
pub fn crossed_above(prev: f64, cur: f64, prev_level: f64, cur_level: f64) -> bool {
    prev <= prev_level && cur > cur_level
}

/// Downward cross of `level`: `prev >= level` and `cur < level`.
pub fn crossed_below(prev: f64, cur: f64, prev_level: f64, cur_level: f64) -> bool {
    prev >= prev_level && cur < cur_level
}
