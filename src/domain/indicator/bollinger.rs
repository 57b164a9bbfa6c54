//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! The middle band is taken from an already computed SMA(n) series so the
//! engine can share it with the SMA cache entry.
//!
//! Warmup: first (period-1) bars are `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    sma: &IndicatorSeries,
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;

    let values = (0..bars.len())
        .map(|i| {
            let middle = sma.simple(i)?;
            if period == 0 || i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];
            let variance = window
                .iter()
                .map(|b| {
                    let diff = b.close - middle;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            let stddev = variance.sqrt();

            Some(IndicatorValue::Bollinger {
                upper: middle + mult * stddev,
                middle,
                lower: middle - mult * stddev,
            })
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::sma::calculate_sma;
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

    fn bollinger(prices: &[f64], period: usize, mult_x100: u32) -> IndicatorSeries {
        let bars = make_bars(prices);
        let sma = calculate_sma(&bars, period);
        calculate_bollinger(&bars, &sma, period, mult_x100)
    }

    #[test]
    fn bollinger_warmup() {
        let series = bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 200);
        assert!(series.bands(0).is_none());
        assert!(series.bands(1).is_none());
        assert!(series.bands(2).is_some());
        assert!(series.bands(4).is_some());
    }

    #[test]
    fn bollinger_constant_values() {
        let series = bollinger(&[100.0; 5], 3, 200);
        let (upper, middle, lower) = series.bands(2).unwrap();
        assert_abs_diff_eq!(middle, 100.0);
        assert_abs_diff_eq!(upper, 100.0);
        assert_abs_diff_eq!(lower, 100.0);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let series = bollinger(&[10.0, 20.0, 30.0], 3, 200);
        let (upper, middle, lower) = series.bands(2).unwrap();

        let expected_middle = 20.0;
        let stddev = ((100.0 + 0.0 + 100.0) / 3.0_f64).sqrt();

        assert_abs_diff_eq!(middle, expected_middle, epsilon = 1e-10);
        assert_abs_diff_eq!(upper, expected_middle + 2.0 * stddev, epsilon = 1e-10);
        assert_abs_diff_eq!(lower, expected_middle - 2.0 * stddev, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let narrow = bollinger(&[10.0, 20.0, 30.0], 3, 100);
        let wide = bollinger(&[10.0, 20.0, 30.0], 3, 300);
        let (nu, _, nl) = narrow.bands(2).unwrap();
        let (wu, _, wl) = wide.bands(2).unwrap();
        assert_abs_diff_eq!((wu - wl) / (nu - nl), 3.0, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let series = bollinger(&[12.0, 7.0, 30.0, 18.0], 3, 200);
        let (upper, middle, lower) = series.bands(3).unwrap();
        assert_abs_diff_eq!(upper - middle, middle - lower, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_indicator_type() {
        let series = bollinger(&[10.0, 20.0, 30.0], 20, 200);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Bollinger {
                period: 20,
                stddev_mult_x100: 200
            }
        );
        assert_eq!(series.first_valid(), None);
    }
}
