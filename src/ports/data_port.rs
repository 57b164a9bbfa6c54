//! Price data access port trait.

use crate::domain::error::StratbenchError;
use crate::domain::price_series::PriceSeries;

pub trait DataPort {
    /// Load the full series, ordered ascending by time.
    fn fetch_series(&self) -> Result<PriceSeries, StratbenchError>;
}
