//! RSI threshold strategy: buy on recovery from oversold, sell on the turn
//! down from overbought.

use crate::domain::indicator::{IndicatorProvider, IndicatorType};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{crossed_above, crossed_below, GeneratedSignals, Signal, SignalGenerator};
use crate::domain::strategy::{degraded, lookup};

#[derive(Debug, Clone, PartialEq)]
pub struct RsiThreshold {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub label: Option<String>,
}

impl RsiThreshold {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        RsiThreshold {
            period,
            oversold,
            overbought,
            label: None,
        }
    }
}

impl SignalGenerator for RsiThreshold {
    fn name(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            format!(
                "RSI {} ({}/{})",
                self.period, self.oversold, self.overbought
            )
        })
    }

    fn required_indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Rsi(self.period)]
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn generate_signals(
        &self,
        series: &PriceSeries,
        indicators: &dyn IndicatorProvider,
    ) -> GeneratedSignals {
        let rsi = match lookup(indicators, &self.required_indicators()) {
            Ok(found) => found[0],
            Err(missing) => return degraded(&self.name(), series.len(), missing),
        };

        let mut signals = vec![Signal::Hold; series.len()];
        for (i, signal) in signals.iter_mut().enumerate().skip(1) {
            if i <= self.warmup() {
                continue;
            }
            let (Some(prev), Some(cur)) = (rsi.simple(i - 1), rsi.simple(i)) else {
                continue;
            };

            if crossed_above(prev, cur, self.oversold, self.oversold) {
                *signal = Signal::Buy;
            } else if crossed_below(prev, cur, self.overbought, self.overbought) {
                *signal = Signal::Sell;
            }
        }

        GeneratedSignals {
            signals,
            missing: Vec::new(),
        }
    }
}
