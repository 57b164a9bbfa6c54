//! Position simulation: turns a signal sequence into an equity curve and a
//! trade log.

use tracing::debug;

use super::error::StratbenchError;
use super::portfolio::Portfolio;
use super::position::{Direction, Trade};
use super::price_series::PriceSeries;
use super::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// Fraction of available cash committed on each entry, in `(0, 1]`.
    pub position_size: f64,
    pub allow_shorting: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_capital: 10_000.0,
            position_size: 0.95,
            allow_shorting: false,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), StratbenchError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(StratbenchError::config_invalid(
                "backtest",
                "initial_capital",
                format!("must be positive, got {}", self.initial_capital),
            ));
        }
        if !(self.position_size > 0.0 && self.position_size <= 1.0) {
            return Err(StratbenchError::config_invalid(
                "backtest",
                "position_size",
                format!("must be in (0, 1], got {}", self.position_size),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub equity_curve: Vec<f64>,
    pub trades: Vec<Trade>,
}

/// Walk the series bar by bar, acting on each signal at that bar's close.
///
/// Equity is marked to market on every bar. An opposite signal closes the
/// open position; entries are never taken on the final bar, and a position
/// still open after it is closed at the last close.
pub fn simulate(
    series: &PriceSeries,
    signals: &[Signal],
    config: &SimulationConfig,
) -> Result<Simulation, StratbenchError> {
    config.validate()?;
    if signals.len() != series.len() {
        return Err(StratbenchError::invariant(format!(
            "{} signals for a series of {} bars",
            signals.len(),
            series.len()
        )));
    }

    let n = series.len();
    let mut portfolio = Portfolio::new(config.initial_capital);
    portfolio.record_equity(series.close(0));

    for (i, &signal) in signals.iter().enumerate().skip(1) {
        let price = series.close(i);

        let exit = matches!(
            (portfolio.direction(), signal),
            (Some(Direction::Long), Signal::Sell) | (Some(Direction::Short), Signal::Buy)
        );
        if exit {
            let trade = portfolio.close(i, price)?;
            debug!(
                bar = i,
                direction = %trade.direction,
                profit = trade.profit,
                "position closed"
            );
        }

        if portfolio.is_flat() && i < n - 1 {
            let entry = match signal {
                Signal::Buy => Some(Direction::Long),
                Signal::Sell if config.allow_shorting => Some(Direction::Short),
                _ => None,
            };
            if let Some(direction) = entry {
                portfolio.open(direction, i, price, config.position_size)?;
                debug!(bar = i, %direction, price, "position opened");
            }
        }

        portfolio.record_equity(price);
    }

    if !portfolio.is_flat() {
        let trade = portfolio.close(n - 1, series.close(n - 1))?;
        debug!(
            bar = n - 1,
            direction = %trade.direction,
            profit = trade.profit,
            "open position closed at end of series"
        );
    }

    Ok(Simulation {
        equity_curve: portfolio.equity_curve,
        trades: portfolio.closed_trades,
    })
}
