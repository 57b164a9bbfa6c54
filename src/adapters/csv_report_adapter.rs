//! CSV export of the comparison table, equity curves and trade logs.

use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use crate::domain::backtest::StrategyRun;
use crate::domain::error::StratbenchError;
use crate::domain::price_series::PriceSeries;
use crate::domain::strategy::slug;
use crate::ports::report_port::ReportPort;

pub const COMPARISON_FILE: &str = "comparison.csv";

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn equity_path(&self, run: &StrategyRun) -> PathBuf {
        self.output_dir.join(format!("{}_equity.csv", slug(&run.name)))
    }

    pub fn trades_path(&self, run: &StrategyRun) -> PathBuf {
        self.output_dir.join(format!("{}_trades.csv", slug(&run.name)))
    }

    fn writer(&self, path: &Path) -> Result<Writer<fs::File>, StratbenchError> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(Writer::from_path(path)?)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_comparison(
        &self,
        _series: &PriceSeries,
        runs: &[StrategyRun],
    ) -> Result<(), StratbenchError> {
        let path = self.output_dir.join(COMPARISON_FILE);
        let mut wtr = self.writer(&path)?;
        wtr.write_record([
            "name",
            "total_return_pct",
            "annual_return_pct",
            "sharpe_ratio",
            "max_drawdown_pct",
            "win_rate_pct",
            "total_trades",
        ])?;
        for run in runs {
            let m = &run.metrics;
            wtr.write_record([
                run.name.clone(),
                m.total_return_pct.to_string(),
                m.annual_return_pct.to_string(),
                m.sharpe_ratio.to_string(),
                m.max_drawdown_pct.to_string(),
                m.win_rate_pct.to_string(),
                m.total_trades.to_string(),
            ])?;
        }
        wtr.flush()?;
        info!(path = %path.display(), strategies = runs.len(), "comparison written");
        Ok(())
    }

    fn write_run(&self, series: &PriceSeries, run: &StrategyRun) -> Result<(), StratbenchError> {
        let equity_path = self.equity_path(run);
        let mut wtr = self.writer(&equity_path)?;
        wtr.write_record(["index", "date", "close", "equity"])?;
        for (i, (bar, equity)) in series.bars().iter().zip(&run.equity_curve).enumerate() {
            wtr.write_record([
                i.to_string(),
                bar.time_label(),
                bar.close.to_string(),
                equity.to_string(),
            ])?;
        }
        wtr.flush()?;

        let trades_path = self.trades_path(run);
        let mut wtr = self.writer(&trades_path)?;
        wtr.write_record([
            "direction",
            "entry_index",
            "exit_index",
            "entry_date",
            "exit_date",
            "entry_price",
            "exit_price",
            "profit",
            "profit_pct",
        ])?;
        for trade in &run.trades {
            wtr.write_record([
                trade.direction.to_string(),
                trade.entry_index.to_string(),
                trade.exit_index.to_string(),
                series.bars()[trade.entry_index].time_label(),
                series.bars()[trade.exit_index].time_label(),
                trade.entry_price.to_string(),
                trade.exit_price.to_string(),
                trade.profit.to_string(),
                trade.profit_pct.to_string(),
            ])?;
        }
        wtr.flush()?;

        info!(
            strategy = %run.name,
            equity = %equity_path.display(),
            trades = %trades_path.display(),
            "strategy detail written"
        );
        Ok(())
    }
}
