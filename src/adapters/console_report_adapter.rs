//! Plain-text strategy comparison printed to stdout.

use std::fmt::Write as _;

use crate::domain::backtest::StrategyRun;
use crate::domain::error::StratbenchError;
use crate::domain::price_series::PriceSeries;
use crate::ports::report_port::ReportPort;

pub struct ConsoleReportAdapter;

fn fmt_ratio(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// Render the comparison table shared by the console output and tests.
pub fn format_comparison(series: &PriceSeries, runs: &[StrategyRun]) -> String {
    let name_width = runs
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("Strategy".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} bars, {} to {}",
        series.symbol(),
        series.len(),
        series.first().time_label(),
        series.last().time_label()
    );
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>10}  {:>10}  {:>7}  {:>8}  {:>8}  {:>6}  {:>13}",
        "Strategy", "Return %", "Annual %", "Sharpe", "MaxDD %", "Win %", "Trades", "Profit factor",
    );
    let _ = writeln!(out, "{}", "-".repeat(name_width + 84));

    for run in runs {
        let m = &run.metrics;
        let _ = write!(
            out,
            "{:<name_width$}  {:>10.2}  {:>10.2}  {:>7.2}  {:>8.2}  {:>8.2}  {:>6}  {:>13}",
            run.name,
            m.total_return_pct,
            m.annual_return_pct,
            m.sharpe_ratio,
            m.max_drawdown_pct,
            m.win_rate_pct,
            m.total_trades,
            fmt_ratio(m.profit_factor),
        );
        if !run.degraded.is_empty() {
            let missing: Vec<String> = run.degraded.iter().map(|i| i.to_string()).collect();
            let _ = write!(out, "  (no data for {})", missing.join(", "));
        }
        out.push('\n');
    }

    if let Some(best) = runs.iter().max_by(|a, b| {
        a.metrics
            .total_return_pct
            .total_cmp(&b.metrics.total_return_pct)
    }) {
        let _ = writeln!(
            out,
            "\nBest total return: {} ({:.2}%)",
            best.name, best.metrics.total_return_pct
        );
    }
    out
}

impl ReportPort for ConsoleReportAdapter {
    fn write_comparison(
        &self,
        series: &PriceSeries,
        runs: &[StrategyRun],
    ) -> Result<(), StratbenchError> {
        print!("{}", format_comparison(series, runs));
        Ok(())
    }
}
