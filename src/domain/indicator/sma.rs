//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars are `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(period);
    if period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: vec![None; bars.len()],
        };
    }

    let values = (0..bars.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];
            let mean = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
            Some(IndicatorValue::Simple(mean))
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                time: i as i64,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn sma_known_values() {
        let bars = make_bars(&[103.0, 107.0, 108.0, 110.0, 114.0]);
        let series = calculate_sma(&bars, 3);

        assert_eq!(series.len(), 5);
        assert_eq!(series.simple(0), None);
        assert_eq!(series.simple(1), None);
        assert_abs_diff_eq!(series.simple(2).unwrap(), 106.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series.simple(3).unwrap(), 108.333_333, epsilon = 1e-5);
        assert_abs_diff_eq!(series.simple(4).unwrap(), 110.666_667, epsilon = 1e-5);
    }

    #[test]
    fn sma_period_1_is_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_sma(&bars, 1);
        for (i, close) in [10.0, 20.0, 30.0].iter().enumerate() {
            assert_abs_diff_eq!(series.simple(i).unwrap(), *close);
        }
    }

    #[test]
    fn sma_period_equal_to_len() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_sma(&bars, 3);
        assert_eq!(series.first_valid(), Some(2));
        assert_abs_diff_eq!(series.simple(2).unwrap(), 20.0);
    }

    #[test]
    fn sma_period_longer_than_series_is_all_none() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 5);
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_valid(), None);
    }

    #[test]
    fn sma_zero_is_not_confused_with_warmup() {
        let bars = make_bars(&[0.0, 0.0, 0.0]);
        let series = calculate_sma(&bars, 2);
        assert_eq!(series.simple(0), None);
        assert_eq!(series.simple(1), Some(0.0));
    }

    #[test]
    fn sma_indicator_type() {
        let series = calculate_sma(&make_bars(&[1.0]), 7);
        assert_eq!(series.indicator_type, IndicatorType::Sma(7));
    }
}
