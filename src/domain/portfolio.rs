//! Cash, open position and equity tracking for one simulation run.

use super::error::StratbenchError;
use super::position::{Direction, Position, Trade};

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub position: Option<Position>,
    pub closed_trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            position: None,
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.position.as_ref().map(|p| p.direction)
    }

    /// Commit `fraction` of cash to a new position.
    pub fn open(
        &mut self,
        direction: Direction,
        index: usize,
        price: f64,
        fraction: f64,
    ) -> Result<(), StratbenchError> {
        if let Some(open) = &self.position {
            return Err(StratbenchError::invariant(format!(
                "bar {}: opening a {} position while a {} position from bar {} is open",
                index, direction, open.direction, open.entry_index
            )));
        }

        let size = self.cash * fraction;
        self.cash -= size;
        self.position = Some(Position {
            direction,
            entry_index: index,
            entry_price: price,
            size,
        });
        Ok(())
    }

    /// Close the open position at `price`, crediting capital plus profit.
    pub fn close(&mut self, index: usize, price: f64) -> Result<&Trade, StratbenchError> {
        let position = self.position.take().ok_or_else(|| {
            StratbenchError::invariant(format!("bar {}: closing with no open position", index))
        })?;
        if index <= position.entry_index {
            return Err(StratbenchError::invariant(format!(
                "trade exit bar {} is not after entry bar {}",
                index, position.entry_index
            )));
        }

        let trade = position.close(index, price);
        self.cash += trade.size + trade.profit;
        self.closed_trades.push(trade);
        Ok(&self.closed_trades[self.closed_trades.len() - 1])
    }

    /// Cash plus the open position marked at `price`.
    pub fn total_equity(&self, price: f64) -> f64 {
        self.cash
            + self
                .position
                .as_ref()
                .map_or(0.0, |p| p.market_value(price))
    }

    pub fn record_equity(&mut self, price: f64) {
        let equity = self.total_equity(price);
        self.equity_curve.push(equity);
    }
}
