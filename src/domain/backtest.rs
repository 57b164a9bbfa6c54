//! Backtest orchestration: indicators, signals, simulation and metrics for
//! each strategy over one price series.

use tracing::info;

use super::error::StratbenchError;
use super::indicator::engine::IndicatorEngine;
use super::indicator::{IndicatorProvider, IndicatorType};
use super::metrics::Metrics;
use super::position::Trade;
use super::price_series::PriceSeries;
use super::signal::{Signal, SignalGenerator};
use super::simulator::{simulate, SimulationConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub position_size: f64,
    pub allow_shorting: bool,
    pub bars_per_year: f64,
    /// Annual rate.
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            position_size: 0.95,
            allow_shorting: false,
            bars_per_year: 252.0,
            risk_free_rate: 0.0,
        }
    }
}

impl BacktestConfig {
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            initial_capital: self.initial_capital,
            position_size: self.position_size,
            allow_shorting: self.allow_shorting,
        }
    }
}

/// Everything produced by running one strategy over one series.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub name: String,
    pub signals: Vec<Signal>,
    pub equity_curve: Vec<f64>,
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
    pub buy_signals: usize,
    pub sell_signals: usize,
    /// Indicators the strategy needed but could not get; non-empty means the
    /// run traded nothing.
    pub degraded: Vec<IndicatorType>,
}

/// Run every strategy against one series, sharing a single indicator cache.
pub fn run_strategies(
    series: &PriceSeries,
    strategies: &[Box<dyn SignalGenerator>],
    config: &BacktestConfig,
) -> Result<Vec<StrategyRun>, StratbenchError> {
    let mut engine = IndicatorEngine::new(series);
    let required: Vec<IndicatorType> = strategies
        .iter()
        .flat_map(|s| s.required_indicators())
        .collect();
    let unavailable = engine.compute_all(&required);
    info!(
        symbol = series.symbol(),
        bars = series.len(),
        strategies = strategies.len(),
        indicators = engine.len(),
        unavailable = unavailable.len(),
        "indicators precomputed"
    );

    strategies
        .iter()
        .map(|strategy| execute(series, strategy.as_ref(), &engine, config))
        .collect()
}

/// Run a single strategy with its own indicator cache.
pub fn run_strategy(
    series: &PriceSeries,
    strategy: &dyn SignalGenerator,
    config: &BacktestConfig,
) -> Result<StrategyRun, StratbenchError> {
    let mut engine = IndicatorEngine::new(series);
    engine.compute_all(&strategy.required_indicators());
    execute(series, strategy, &engine, config)
}

fn execute(
    series: &PriceSeries,
    strategy: &dyn SignalGenerator,
    indicators: &dyn IndicatorProvider,
    config: &BacktestConfig,
) -> Result<StrategyRun, StratbenchError> {
    let name = strategy.name();
    let generated = strategy.generate_signals(series, indicators);

    let simulation = simulate(series, &generated.signals, &config.simulation())?;
    let metrics = Metrics::compute(
        &simulation.equity_curve,
        &simulation.trades,
        config.initial_capital,
        config.bars_per_year,
        config.risk_free_rate,
    );

    info!(
        strategy = %name,
        trades = metrics.total_trades,
        total_return_pct = metrics.total_return_pct,
        "strategy finished"
    );

    Ok(StrategyRun {
        buy_signals: generated.count(Signal::Buy),
        sell_signals: generated.count(Signal::Sell),
        name,
        signals: generated.signals,
        equity_curve: simulation.equity_curve,
        trades: simulation.trades,
        metrics,
        degraded: generated.missing,
    })
}
