//! Exponential Moving Average indicator.
//!
//! α = 2/(n+1), seed with the SMA of the first n closes, then
//! EMA[i] = (C[i] - EMA[i-1])·α + EMA[i-1].
//! Warmup: first (n-1) bars are `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries {
            indicator_type,
            values: vec![None; bars.len()],
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < period - 1 {
            sum += bar.close;
            values.push(None);
        } else if i == period - 1 {
            sum += bar.close;
            ema = sum / period as f64;
            values.push(Some(IndicatorValue::Simple(ema)));
        } else {
            ema += (bar.close - ema) * alpha;
            values.push(Some(IndicatorValue::Simple(ema)));
        }
    }

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
    fn ema_warmup() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);
        assert_eq!(series.simple(0), None);
        assert_eq!(series.simple(1), None);
        assert!(series.simple(2).is_some());
        assert!(series.simple(4).is_some());
    }

    #[test]
    fn ema_seed_is_sma() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0]), 3);
        assert_abs_diff_eq!(series.simple(2).unwrap(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);

        let alpha = 0.5;
        let seed = 20.0;
        let ema_3 = (40.0 - seed) * alpha + seed;
        let ema_4 = (50.0 - ema_3) * alpha + ema_3;

        assert_abs_diff_eq!(series.simple(3).unwrap(), ema_3, epsilon = 1e-12);
        assert_abs_diff_eq!(series.simple(4).unwrap(), ema_4, epsilon = 1e-12);
    }

    #[test]
    fn ema_is_convex_combination() {
        let closes = [5.0, 9.0, 2.0, 14.0, 3.0, 8.0, 11.0];
        let series = calculate_ema(&make_bars(&closes), 3);
        for i in 3..closes.len() {
            let prev = series.simple(i - 1).unwrap();
            let cur = series.simple(i).unwrap();
            let lo = prev.min(closes[i]);
            let hi = prev.max(closes[i]);
            assert!(cur >= lo && cur <= hi, "EMA[{}] = {} outside [{}, {}]", i, cur, lo, hi);
        }
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&make_bars(&[100.0; 5]), 3);
        for i in 2..5 {
            assert_abs_diff_eq!(series.simple(i).unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_period_0() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0]), 0);
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_valid(), None);
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.is_empty());
    }
}
