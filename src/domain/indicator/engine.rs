//! Memoizing indicator engine bound to one price series.
//!
//! The cache lives as long as the engine; a new series needs a new engine.
//! Invalid requests (`period == 0` or longer than the series) never create a
//! cache entry.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::error::StratbenchError;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorProvider, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

#[derive(Debug)]
pub struct IndicatorEngine<'a> {
    series: &'a PriceSeries,
    cache: HashMap<IndicatorType, IndicatorSeries>,
    computations: usize,
}

impl<'a> IndicatorEngine<'a> {
    pub fn new(series: &'a PriceSeries) -> Self {
        IndicatorEngine {
            series,
            cache: HashMap::new(),
            computations: 0,
        }
    }

    pub fn series(&self) -> &PriceSeries {
        self.series
    }

    /// Compute `indicator_type`, or return the cached result for a repeated key.
    pub fn compute(
        &mut self,
        indicator_type: IndicatorType,
    ) -> Result<&IndicatorSeries, StratbenchError> {
        let period = indicator_type.period();
        if period == 0 || period > self.series.len() {
            warn!(
                indicator = %indicator_type,
                bars = self.series.len(),
                "indicator request out of range, not computed"
            );
            return Err(StratbenchError::IndicatorUnavailable {
                indicator: indicator_type,
                bars: self.series.len(),
            });
        }

        if self.cache.contains_key(&indicator_type) {
            debug!(indicator = %indicator_type, "indicator cache hit");
        } else {
            let computed = match indicator_type {
                IndicatorType::Sma(p) => calculate_sma(self.series.bars(), p),
                IndicatorType::Ema(p) => calculate_ema(self.series.bars(), p),
                IndicatorType::Rsi(p) => calculate_rsi(self.series.bars(), p),
                IndicatorType::Bollinger {
                    period,
                    stddev_mult_x100,
                } => {
                    let sma = self.compute(IndicatorType::Sma(period))?.clone();
                    calculate_bollinger(self.series.bars(), &sma, period, stddev_mult_x100)
                }
            };
            self.computations += 1;
            debug!(indicator = %indicator_type, bars = computed.len(), "indicator computed");
            self.cache.insert(indicator_type, computed);
        }

        self.cache
            .get(&indicator_type)
            .ok_or(StratbenchError::IndicatorUnavailable {
                indicator: indicator_type,
                bars: self.series.len(),
            })
    }

    /// Compute every requested indicator, collecting the ones that were unavailable.
    pub fn compute_all(&mut self, indicator_types: &[IndicatorType]) -> Vec<IndicatorType> {
        indicator_types
            .iter()
            .filter(|ty| self.compute(**ty).is_err())
            .copied()
            .collect()
    }

    pub fn get(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.cache.get(indicator_type)
    }

    pub fn contains(&self, indicator_type: &IndicatorType) -> bool {
        self.cache.contains_key(indicator_type)
    }

    /// Number of cache entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of indicator calculations actually performed (cache misses).
    pub fn computations(&self) -> usize {
        self.computations
    }
}

impl IndicatorProvider for IndicatorEngine<'_> {
    fn indicator(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.get(indicator_type)
    }
}
