//! stratbench: single-series trading strategy backtester.
//!
//! Hexagonal architecture: indicator, signal, simulation and metrics logic in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`], and the command-line front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
