//! Report generation port trait.

use crate::domain::backtest::StrategyRun;
use crate::domain::error::StratbenchError;
use crate::domain::price_series::PriceSeries;

/// Port for writing backtest reports.
pub trait ReportPort {
    /// Side-by-side summary of every strategy run.
    fn write_comparison(
        &self,
        series: &PriceSeries,
        runs: &[StrategyRun],
    ) -> Result<(), StratbenchError>;

    /// Per-strategy detail. Default implementation writes nothing.
    fn write_run(&self, _series: &PriceSeries, _run: &StrategyRun) -> Result<(), StratbenchError> {
        Ok(())
    }

    fn write(&self, series: &PriceSeries, runs: &[StrategyRun]) -> Result<(), StratbenchError> {
        self.write_comparison(series, runs)?;
        for run in runs {
            self.write_run(series, run)?;
        }
        Ok(())
    }
}
