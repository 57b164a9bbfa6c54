//! Bollinger mean reversion: buy when the close climbs back inside the lower
//! band, sell when it falls back inside the upper band.

use crate::domain::indicator::{IndicatorProvider, IndicatorType};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{crossed_above, crossed_below, GeneratedSignals, Signal, SignalGenerator};
use crate::domain::strategy::{degraded, lookup};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerReversion {
    pub period: usize,
    pub stddev_mult: f64,
    pub label: Option<String>,
}

impl BollingerReversion {
    pub fn new(period: usize, stddev_mult: f64) -> Self {
        BollingerReversion {
            period,
            stddev_mult,
            label: None,
        }
    }
}

impl SignalGenerator for BollingerReversion {
    fn name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Bollinger Bands {} ({})", self.period, self.stddev_mult))
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

        let mut signals = vec![Signal::Hold; series.len()];
        for (i, signal) in signals.iter_mut().enumerate().skip(1) {
            if i < self.period {
                continue;
            }
            let (Some((upper_prev, _, lower_prev)), Some((upper_cur, _, lower_cur))) =
                (bands.bands(i - 1), bands.bands(i))
            else {
                continue;
            };
            let (prev, cur) = (series.close(i - 1), series.close(i));

            if crossed_above(prev, cur, lower_prev, lower_cur) {
                *signal = Signal::Buy;
            } else if crossed_below(prev, cur, upper_prev, upper_cur) {
                *signal = Signal::Sell;
            }
        }

        GeneratedSignals {
            signals,
            missing: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::engine::IndicatorEngine;

    fn run(closes: &[f64], period: usize, mult: f64) -> GeneratedSignals {
        let series = PriceSeries::from_closes("TEST", closes).unwrap();
        let strategy = BollingerReversion::new(period, mult);
        let mut engine = IndicatorEngine::new(&series);
        engine.compute_all(&strategy.required_indicators());
        strategy.generate_signals(&series, &engine)
    }

    #[test]
    fn buy_after_dip_below_lower_band() {
        // The plunge at index 4 closes below its own lower band, the rebound
        // at index 5 closes back inside.
        let closes = [100.0, 100.0, 100.0, 100.0, 80.0, 100.0, 100.0];
        let out = run(&closes, 3, 1.0);
        assert_eq!(out.signals[5], Signal::Buy);
        assert_eq!(out.count(Signal::Buy), 1);
    }

    #[test]
    fn sell_after_spike_above_upper_band() {
        let closes = [100.0, 100.0, 100.0, 100.0, 120.0, 100.0, 100.0];
        let out = run(&closes, 3, 1.0);
        assert_eq!(out.signals[5], Signal::Sell);
        assert_eq!(out.count(Signal::Sell), 1);
    }

    #[test]
    fn indices_before_period_are_hold() {
        let closes: Vec<f64> = (0..40).map(|i| ((i as f64) * 1.3).cos() * 15.0 + 100.0).collect();
        let out = run(&closes, 5, 0.5);
        for i in 0..5 {
            assert_eq!(out.signals[i], Signal::Hold);
        }
    }

    #[test]
    fn missing_bands_degrade() {
        let out = run(&[1.0, 2.0], 20, 2.0);
        assert!(out.is_degraded());
        assert_eq!(out.signals, vec![Signal::Hold; 2]);
    }

    #[test]
    fn default_name() {
        assert_eq!(BollingerReversion::new(20, 2.0).name(), "Bollinger Bands 20 (2)");
        assert_eq!(BollingerReversion::new(20, 2.5).name(), "Bollinger Bands 20 (2.5)");
    }
}
