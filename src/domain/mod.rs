//! Core domain types and logic: indicators, signals, simulation, metrics.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod signal;
pub mod strategy;
pub mod position;
pub mod portfolio;
pub mod simulator;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
