//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::console_report_adapter::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_strategies, BacktestConfig, StrategyRun};
use crate::domain::config_validation::{
    parse_strategy_section, read_f64, strategy_sections, validate_backtest_config,
    validate_strategy_config, BACKTEST_SECTION,
};
use crate::domain::error::StratbenchError;
use crate::domain::signal::SignalGenerator;
use crate::domain::strategy::{default_strategies, StrategyConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stratbench", about = "Trading strategy backtester for a single price series")]
pub struct Cli {
    /// Log level or filter directive; STRATBENCH_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every configured strategy over a price series
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV; overrides [backtest] data
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Directory for CSV exports; overrides [report] output_dir
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file and list its strategies
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show symbol, bar count and time range of a price CSV
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            output,
        } => run_backtest(&config, data.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data } => run_info(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StratbenchError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, StratbenchError> {
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        initial_capital: read_f64(
            adapter,
            BACKTEST_SECTION,
            "initial_capital",
            defaults.initial_capital,
        )?,
        position_size: read_f64(
            adapter,
            BACKTEST_SECTION,
            "position_size",
            defaults.position_size,
        )?,
        allow_shorting: adapter.get_bool(BACKTEST_SECTION, "allow_shorting", defaults.allow_shorting),
        bars_per_year: read_f64(
            adapter,
            BACKTEST_SECTION,
            "bars_per_year",
            defaults.bars_per_year,
        )?,
        risk_free_rate: read_f64(
            adapter,
            BACKTEST_SECTION,
            "risk_free_rate",
            defaults.risk_free_rate,
        )?,
    })
}

/// Strategies listed under `[strategies]`, or the built-in set when that
/// section is absent.
pub fn build_strategies(adapter: &dyn ConfigPort) -> Result<Vec<StrategyConfig>, StratbenchError> {
    let sections = strategy_sections(adapter)?;
    if sections.is_empty() {
        return Ok(default_strategies());
    }
    sections
        .iter()
        .map(|section| parse_strategy_section(adapter, section))
        .collect()
}

pub fn resolve_data_path(
    data_override: Option<&Path>,
    adapter: &dyn ConfigPort,
) -> Result<PathBuf, StratbenchError> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    adapter
        .get_string(BACKTEST_SECTION, "data")
        .map(PathBuf::from)
        .ok_or_else(|| StratbenchError::ConfigMissing {
            section: BACKTEST_SECTION.to_string(),
            key: "data".to_string(),
        })
}

pub fn resolve_output_dir(output_override: Option<&Path>, adapter: &dyn ConfigPort) -> Option<PathBuf> {
    output_override
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "output_dir").map(PathBuf::from))
}

/// Load, run and report. Every report port receives the full set of runs.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    strategies: &[StrategyConfig],
    bt_config: &BacktestConfig,
    reports: &[&dyn ReportPort],
) -> Result<Vec<StrategyRun>, StratbenchError> {
    let series = data_port.fetch_series()?;
    let generators: Vec<Box<dyn SignalGenerator>> = strategies.iter().map(|s| s.build()).collect();

    info!(
        symbol = series.symbol(),
        bars = series.len(),
        strategies = generators.len(),
        "running backtest"
    );
    let runs = run_strategies(&series, &generators, bt_config)?;

    for report in reports {
        report.write(&series, &runs)?;
    }
    Ok(runs)
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    output_override: Option<&Path>,
) -> Result<(), StratbenchError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let strategies = build_strategies(&adapter)?;
    let data_path = resolve_data_path(data_override, &adapter)?;
    let output_dir = resolve_output_dir(output_override, &adapter);

    let data_port = CsvAdapter::new(data_path);
    let console = ConsoleReportAdapter;
    let csv_report = output_dir.map(CsvReportAdapter::new);

    let mut reports: Vec<&dyn ReportPort> = vec![&console];
    if let Some(csv_report) = &csv_report {
        reports.push(csv_report);
    }

    run_backtest_pipeline(&data_port, &strategies, &bt_config, &reports)?;

    if let Some(csv_report) = &csv_report {
        eprintln!("Results exported to {}", csv_report.output_dir().display());
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StratbenchError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let strategies = build_strategies(&adapter)?;

    println!("Configuration is valid.");
    println!(
        "  capital {:.2}, position size {}, shorting {}, {} bars/year, risk-free {}",
        bt_config.initial_capital,
        bt_config.position_size,
        if bt_config.allow_shorting { "on" } else { "off" },
        bt_config.bars_per_year,
        bt_config.risk_free_rate
    );
    if let Some(data) = adapter.get_string(BACKTEST_SECTION, "data") {
        println!("  data: {}", data);
    }
    println!("Strategies:");
    for strategy in &strategies {
        let generator = strategy.build();
        let indicators: Vec<String> = generator
            .required_indicators()
            .iter()
            .map(|i| i.to_string())
            .collect();
        println!(
            "  {} [{}] warm-up {} bars",
            generator.name(),
            indicators.join(", "),
            generator.warmup()
        );
    }
    Ok(())
}

fn run_info(data_path: &Path) -> Result<(), StratbenchError> {
    let series = CsvAdapter::new(data_path).fetch_series()?;
    let (low, high) = series
        .bars()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
            (lo.min(b.close), hi.max(b.close))
        });

    println!(
        "{}: {} bars, {} to {}",
        series.symbol(),
        series.len(),
        series.first().time_label(),
        series.last().time_label()
    );
    println!(
        "  close: first {}, last {}, min {}, max {}",
        series.first().close,
        series.last().close,
        low,
        high
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::StrategyKind;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn backtest_config_defaults() {
        let c = build_backtest_config(&config("[backtest]\n")).unwrap();
        assert_eq!(c, BacktestConfig::default());
    }

    #[test]
    fn backtest_config_from_file() {
        let c = build_backtest_config(&config(
            "[backtest]\ninitial_capital = 5000\nposition_size = 0.5\nallow_shorting = true\nbars_per_year = 365\nrisk_free_rate = 0.02\n",
        ))
        .unwrap();
        assert_eq!(c.initial_capital, 5000.0);
        assert_eq!(c.position_size, 0.5);
        assert!(c.allow_shorting);
        assert_eq!(c.bars_per_year, 365.0);
        assert_eq!(c.risk_free_rate, 0.02);
    }

    #[test]
    fn default_strategies_without_section() {
        let strategies = build_strategies(&config("[backtest]\n")).unwrap();
        assert_eq!(strategies, default_strategies());
        assert_eq!(strategies.len(), 4);
    }

    #[test]
    fn strategies_in_listed_order() {
        let strategies = build_strategies(&config(
            "[strategies]\nnames = b, a\n[a]\nkind = sma_crossover\nshort = 2\nlong = 4\n[b]\nkind = rsi\n",
        ))
        .unwrap();
        assert!(matches!(strategies[0].kind, StrategyKind::RsiThreshold { .. }));
        assert_eq!(
            strategies[1].kind,
            StrategyKind::SmaCrossover { short: 2, long: 4 }
        );
    }

    #[test]
    fn data_path_override_wins() {
        let adapter = config("[backtest]\ndata = from_config.csv\n");
        assert_eq!(
            resolve_data_path(Some(Path::new("cli.csv")), &adapter).unwrap(),
            PathBuf::from("cli.csv")
        );
        assert_eq!(
            resolve_data_path(None, &adapter).unwrap(),
            PathBuf::from("from_config.csv")
        );
    }

    #[test]
    fn missing_data_path_is_config_missing() {
        let result = resolve_data_path(None, &config("[backtest]\n"));
        assert!(matches!(result, Err(StratbenchError::ConfigMissing { .. })));
    }

    #[test]
    fn output_dir_from_report_section() {
        let adapter = config("[report]\noutput_dir = out\n");
        assert_eq!(resolve_output_dir(None, &adapter), Some(PathBuf::from("out")));
        assert_eq!(
            resolve_output_dir(Some(Path::new("cli")), &adapter),
            Some(PathBuf::from("cli"))
        );
        assert_eq!(resolve_output_dir(None, &config("[backtest]\n")), None);
    }

    #[test]
    fn cli_parses_global_log_level() {
        let cli = Cli::try_parse_from([
            "stratbench",
            "backtest",
            "--config",
            "c.ini",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Backtest { .. }));

        let cli = Cli::try_parse_from(["stratbench", "info", "--data", "d.csv"]).unwrap();
        assert_eq!(cli.log_level, "info");
    }
}
