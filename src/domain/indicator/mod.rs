//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as cache key)
//! - `IndicatorSeries`: A bar-aligned series of indicator values, `None` during warm-up
//! - `IndicatorProvider`: Read-only lookup used by signal generators
//!
//! Every calculation works on close prices.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod bollinger;
pub mod engine;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Bollinger { upper: f64, middle: f64, lower: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl IndicatorType {
    /// Bollinger key for a floating multiplier, rounded to hundredths.
    pub fn bollinger(period: usize, stddev_mult: f64) -> Self {
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (stddev_mult * 100.0).round().max(0.0) as u32,
        }
    }

    pub fn period(&self) -> usize {
        match self {
            IndicatorType::Sma(p) | IndicatorType::Ema(p) | IndicatorType::Rsi(p) => *p,
            IndicatorType::Bollinger { period, .. } => *period,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<IndicatorValue>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Single-line value at `index`; `None` during warm-up, out of range,
    /// or for band-shaped series.
    pub fn simple(&self, index: usize) -> Option<f64> {
        match self.values.get(index).copied().flatten() {
            Some(IndicatorValue::Simple(v)) => Some(v),
            _ => None,
        }
    }

    /// `(upper, middle, lower)` at `index` for band-shaped series.
    pub fn bands(&self, index: usize) -> Option<(f64, f64, f64)> {
        match self.values.get(index).copied().flatten() {
            Some(IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            }) => Some((upper, middle, lower)),
            _ => None,
        }
    }

    /// Index of the first defined value.
    pub fn first_valid(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }
}

/// Read-only access to computed indicators.
pub trait IndicatorProvider {
    fn indicator(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries>;
}
