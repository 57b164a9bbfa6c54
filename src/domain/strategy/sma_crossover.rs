//! Moving-average crossover: buy the golden cross, sell the death cross.

use crate::domain::indicator::{IndicatorProvider, IndicatorType};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{crossed_above, crossed_below, GeneratedSignals, Signal, SignalGenerator};
use crate::domain::strategy::{degraded, lookup};

#[derive(Debug, Clone, PartialEq)]
pub struct SmaCrossover {
    pub short: usize,
    pub long: usize,
    pub label: Option<String>,
}

impl SmaCrossover {
    pub fn new(short: usize, long: usize) -> Self {
        SmaCrossover {
            short,
            long,
            label: None,
        }
    }
}

impl SignalGenerator for SmaCrossover {
    fn name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("SMA Crossover {}/{}", self.short, self.long))
    }

    fn required_indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Sma(self.short), IndicatorType::Sma(self.long)]
    }

    fn warmup(&self) -> usize {
        self.long.saturating_sub(1)
    }

    fn generate_signals(
        &self,
        series: &PriceSeries,
        indicators: &dyn IndicatorProvider,
    ) -> GeneratedSignals {
        let found = match lookup(indicators, &self.required_indicators()) {
            Ok(found) => found,
            Err(missing) => return degraded(&self.name(), series.len(), missing),
        };
        let (short_sma, long_sma) = (found[0], found[1]);

        let mut signals = vec![Signal::Hold; series.len()];
        for (i, signal) in signals.iter_mut().enumerate().skip(1) {
            if i < self.warmup() {
                continue;
            }
            let (Some(s_prev), Some(s_cur), Some(l_prev), Some(l_cur)) = (
                short_sma.simple(i - 1),
                short_sma.simple(i),
                long_sma.simple(i - 1),
                long_sma.simple(i),
            ) else {
                continue;
            };

            if crossed_above(s_prev, s_cur, l_prev, l_cur) {
                *signal = Signal::Buy;
            } else if crossed_below(s_prev, s_cur, l_prev, l_cur) {
                *signal = Signal::Sell;
            }
        }

        GeneratedSignals {
            signals,
            missing: Vec::new(),
        }
    }
}
