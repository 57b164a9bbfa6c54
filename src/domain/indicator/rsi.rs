//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over bars 1..=n
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are `None` (need n price changes for the first average).

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);
    let mut values = vec![None; bars.len()];

    if period == 0 || bars.len() <= period {
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = std::iter::once((0.0, 0.0))
        .chain(bars.windows(2).map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        }))
        .unzip();

    let mut avg_gain = gains[1..=period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[1..=period].iter().sum::<f64>() / period as f64;
    values[period] = Some(IndicatorValue::Simple(rsi_from_averages(avg_gain, avg_loss)));

    let smoothing = (period - 1) as f64;
    for i in period + 1..bars.len() {
        avg_gain = (avg_gain * smoothing + gains[i]) / period as f64;
        avg_loss = (avg_loss * smoothing + losses[i]) / period as f64;
        values[i] = Some(IndicatorValue::Simple(rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
