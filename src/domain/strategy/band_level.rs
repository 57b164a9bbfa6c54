//! Band-level mean reversion: buy on every bar that closes below the lower
//! Bollinger band, sell on every bar that closes above the upper band.
//!
//! Unlike [`BollingerReversion`](super::BollingerReversion) this reacts to
//! where the close sits, not to a crossing, so a run of bars outside a band
//! repeats the signal.

use crate::domain::indicator::{IndicatorProvider, IndicatorType};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{GeneratedSignals, Signal, SignalGenerator};
use crate::domain::strategy::{degraded, lookup};

#[derive(Debug, Clone, PartialEq)]
pub struct BandLevelReversion {
    pub period: usize,
    pub stddev_mult: f64,
    pub label: Option<String>,
}

impl BandLevelReversion {
    pub fn new(period: usize, stddev_mult: f64) -> Self {
        BandLevelReversion {
            period,
            stddev_mult,
            label: None,
        }
    }
}

impl SignalGenerator for BandLevelReversion {
    fn name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Mean Reversion {} ({})", self.period, self.stddev_mult))
    }

    fn required_indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::bollinger(self.period, self.stddev_mult)]
    }

    fn warmup(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn generate_signals(
        &self,
        series: &PriceSeries,
        indicators: &dyn IndicatorProvider,
    ) -> GeneratedSignals {
        let bands = match lookup(indicators, &self.required_indicators()) {
            Ok(found) => found[0],
            Err(missing) => return degraded(&self.name(), series.len(), missing),
        };

        // Bar 0 stays Hold even for a one-bar window.
        let mut signals = vec![Signal::Hold; series.len()];
        for (i, signal) in signals.iter_mut().enumerate().skip(1) {
            let Some((upper, _, lower)) = bands.bands(i) else {
                continue;
            };
            let close = series.close(i);
            if close > upper {
                *signal = Signal::Sell;
            } else if close < lower {
                *signal = Signal::Buy;
            }
        }

        GeneratedSignals {
            signals,
            missing: Vec::new(),
        }
    }
}
