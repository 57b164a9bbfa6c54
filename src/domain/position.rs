//! Open position and closed trade records.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// Capital committed to a single open position.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub direction: Direction,
    pub entry_index: usize,
    pub entry_price: f64,
    /// Capital committed at entry, in quote currency.
    pub size: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.direction == Direction::Long
    }

    pub fn is_short(&self) -> bool {
        self.direction == Direction::Short
    }

    /// Profit if closed at `price`.
    ///
    /// Long: size·(price/entry - 1). Short: size·(entry/price - 1).
    pub fn profit_at(&self, price: f64) -> f64 {
        match self.direction {
            Direction::Long => self.size * (price / self.entry_price - 1.0),
            Direction::Short => self.size * (self.entry_price / price - 1.0),
        }
    }

    /// Committed capital plus unrealized profit at `price`.
    pub fn market_value(&self, price: f64) -> f64 {
        self.size + self.profit_at(price)
    }

    /// Close at `price` on bar `exit_index`.
    pub fn close(self, exit_index: usize, price: f64) -> Trade {
        let profit = self.profit_at(price);
        Trade {
            direction: self.direction,
            entry_index: self.entry_index,
            exit_index,
            entry_price: self.entry_price,
            exit_price: price,
            size: self.size,
            profit,
            profit_pct: 100.0 * profit / self.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub direction: Direction,
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub profit: f64,
    pub profit_pct: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    /// Holding period in bars.
    pub fn bars_held(&self) -> usize {
        self.exit_index.saturating_sub(self.entry_index)
    }
}
