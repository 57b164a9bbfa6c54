//! Performance metrics computed from an equity curve and trade log.

use super::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return_pct: f64,
    pub annual_return_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_duration: usize,
    pub win_rate_pct: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub avg_profit_per_trade_pct: f64,
    pub profit_factor: f64,
    pub final_equity: f64,
}

impl Metrics {
    /// `risk_free_rate` is annual; it is spread evenly over `bars_per_year`.
    pub fn compute(
        equity_curve: &[f64],
        trades: &[Trade],
        initial_capital: f64,
        bars_per_year: f64,
        risk_free_rate: f64,
    ) -> Self {
        let final_equity = equity_curve.last().copied().unwrap_or(initial_capital);

        let total_return_pct = if equity_curve.is_empty() || initial_capital <= 0.0 {
            0.0
        } else {
            100.0 * (final_equity / initial_capital - 1.0)
        };

        let annual_return_pct = annualize(total_return_pct, equity_curve.len(), bars_per_year);

        let (max_drawdown_pct, max_drawdown_duration) = compute_drawdown(equity_curve);

        let rf_per_bar = if bars_per_year > 0.0 {
            risk_free_rate / bars_per_year
        } else {
            0.0
        };
        let (sharpe_ratio, sortino_ratio) =
            compute_risk_adjusted(&period_returns(equity_curve), rf_per_bar, bars_per_year);

        let mut winning_trades = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;
        let mut profit_pct_sum = 0.0_f64;

        for trade in trades {
            if trade.profit > 0.0 {
                winning_trades += 1;
                gross_profit += trade.profit;
            } else if trade.profit < 0.0 {
                gross_loss += trade.profit.abs();
            }
            profit_pct_sum += trade.profit_pct;
        }

        let total_trades = trades.len();
        let (win_rate_pct, avg_profit_per_trade_pct) = if total_trades > 0 {
            (
                100.0 * winning_trades as f64 / total_trades as f64,
                profit_pct_sum / total_trades as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        Metrics {
            total_return_pct,
            annual_return_pct,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown_pct,
            max_drawdown_duration,
            win_rate_pct,
            total_trades,
            winning_trades,
            avg_profit_per_trade_pct,
            profit_factor,
            final_equity,
        }
    }
}

/// Bar-over-bar fractional returns, one shorter than the curve.
pub fn period_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

fn annualize(total_return_pct: f64, bars: usize, bars_per_year: f64) -> f64 {
    if bars_per_year <= 0.0 || bars == 0 {
        return 0.0;
    }
    let years = bars as f64 / bars_per_year;
    let growth = 1.0 + total_return_pct / 100.0;
    if growth <= 0.0 {
        return -100.0;
    }
    100.0 * (growth.powf(1.0 / years) - 1.0)
}

/// Largest peak-to-trough decline in percent, and the longest run of bars
/// spent below a prior peak.
fn compute_drawdown(equity_curve: &[f64]) -> (f64, usize) {
    let Some(&first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    let mut max_duration = 0usize;
    let mut current_duration = 0usize;

    for &equity in equity_curve {
        if equity >= peak {
            peak = equity;
            current_duration = 0;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - equity) / peak);
            current_duration += 1;
            max_duration = max_duration.max(current_duration);
        }
    }

    (100.0 * max_dd, max_duration)
}

fn compute_risk_adjusted(returns: &[f64], rf_per_bar: f64, bars_per_year: f64) -> (f64, f64) {
    if returns.is_empty() || bars_per_year <= 0.0 {
        return (0.0, 0.0);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let excess_return = mean - rf_per_bar;
    let annualizer = bars_per_year.sqrt();

    let sharpe = if stddev > 0.0 {
        excess_return / stddev * annualizer
    } else {
        0.0
    };

    let downside_variance = returns
        .iter()
        .filter(|&&r| r < rf_per_bar)
        .map(|&r| (r - rf_per_bar).powi(2))
        .sum::<f64>()
        / n;
    let downside_stddev = downside_variance.sqrt();

    let sortino = if downside_stddev > 0.0 {
        excess_return / downside_stddev * annualizer
    } else {
        0.0
    };

    (sharpe, sortino)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Direction;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn make_trade(profit: f64) -> Trade {
        let size = 1_000.0;
        Trade {
            direction: Direction::Long,
            entry_index: 1,
            exit_index: 2,
            entry_price: 100.0,
            exit_price: 100.0 * (1.0 + profit / size),
            size,
            profit,
            profit_pct: 100.0 * profit / size,
        }
    }

    fn compute(equity: &[f64], trades: &[Trade]) -> Metrics {
        Metrics::compute(equity, trades, 10_000.0, 252.0, 0.0)
    }

    #[test]
    fn empty_curve_is_neutral() {
        let m = compute(&[], &[]);
        assert_eq!(m.total_return_pct, 0.0);
        assert_eq!(m.annual_return_pct, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.max_drawdown_pct, 0.0);
        assert_eq!(m.final_equity, 10_000.0);
    }

    #[test]
    fn flat_curve_has_no_drawdown_and_zero_sharpe() {
        let m = compute(&[10_000.0, 10_000.0, 10_000.0], &[]);
        assert_eq!(m.max_drawdown_pct, 0.0);
        assert_eq!(m.max_drawdown_duration, 0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.sortino_ratio, 0.0);
    }

    #[test]
    fn drawdown_from_running_peak() {
        let m = compute(&[10_000.0, 12_000.0, 9_000.0, 11_000.0], &[]);
        assert_relative_eq!(m.max_drawdown_pct, 25.0, epsilon = 1e-9);
        assert_eq!(m.max_drawdown_duration, 2);
    }

    #[test]
    fn total_return() {
        let m = compute(&[10_000.0, 11_000.0], &[]);
        assert_relative_eq!(m.total_return_pct, 10.0, epsilon = 1e-9);
        assert_eq!(m.final_equity, 11_000.0);

        let m = compute(&[10_000.0, 9_000.0], &[]);
        assert_relative_eq!(m.total_return_pct, -10.0, epsilon = 1e-9);
    }

    #[test]
    fn annual_return_over_one_year_equals_total() {
        let mut equity = vec![10_000.0; 251];
        equity.push(12_000.0);
        let m = compute(&equity, &[]);
        assert_relative_eq!(m.annual_return_pct, m.total_return_pct, epsilon = 1e-9);
    }

    #[test]
    fn annual_return_of_wiped_out_capital() {
        let m = compute(&[10_000.0, 5_000.0, 0.0], &[]);
        assert_eq!(m.annual_return_pct, -100.0);
    }

    #[test]
    fn period_returns_of_closes() {
        let r = period_returns(&[103.0, 107.0, 108.0, 110.0, 114.0]);
        assert_eq!(r.len(), 4);
        assert_abs_diff_eq!(r[0], 0.0388, epsilon = 1e-4);
        assert_abs_diff_eq!(r[1], 0.00935, epsilon = 1e-5);
        assert_abs_diff_eq!(r[2], 0.01852, epsilon = 1e-5);
        assert_abs_diff_eq!(r[3], 0.03636, epsilon = 1e-5);
    }

    #[test]
    fn sharpe_positive_for_rising_noisy_curve() {
        let m = compute(&[10_000.0, 10_100.0, 10_150.0, 10_300.0, 10_280.0], &[]);
        assert!(m.sharpe_ratio > 0.0);
        assert!(m.sortino_ratio > 0.0);
    }

    #[test]
    fn risk_free_rate_lowers_sharpe() {
        let equity = [10_000.0, 10_100.0, 10_150.0, 10_300.0, 10_280.0];
        let without = Metrics::compute(&equity, &[], 10_000.0, 252.0, 0.0);
        let with = Metrics::compute(&equity, &[], 10_000.0, 252.0, 0.5);
        assert!(with.sharpe_ratio < without.sharpe_ratio);
    }

    #[test]
    fn trade_statistics() {
        let trades = [make_trade(100.0), make_trade(-50.0), make_trade(200.0), make_trade(0.0)];
        let m = compute(&[10_000.0, 10_250.0], &trades);

        assert_eq!(m.total_trades, 4);
        assert_eq!(m.winning_trades, 2);
        assert_relative_eq!(m.win_rate_pct, 50.0);
        assert_relative_eq!(m.profit_factor, 6.0, epsilon = 1e-9);
        assert_relative_eq!(m.avg_profit_per_trade_pct, 6.25, epsilon = 1e-9);
    }

    #[test]
    fn zero_trades_are_neutral() {
        let m = compute(&[10_000.0, 10_500.0], &[]);
        assert_eq!(m.total_trades, 0);
        assert_eq!(m.win_rate_pct, 0.0);
        assert_eq!(m.avg_profit_per_trade_pct, 0.0);
        assert_eq!(m.profit_factor, 0.0);
    }

    #[test]
    fn profit_factor_without_losses_is_infinite() {
        let m = compute(&[10_000.0, 10_100.0], &[make_trade(100.0)]);
        assert!(m.profit_factor.is_infinite());
    }

    #[test]
    fn repeated_computation_is_identical() {
        let equity = [10_000.0, 10_400.0, 9_700.0, 10_900.0];
        let trades = [make_trade(400.0), make_trade(-300.0)];
        assert_eq!(compute(&equity, &trades), compute(&equity, &trades));
    }
}
