//! Configuration validation.
//!
//! Checks the `[backtest]` section and every strategy section listed under
//! `[strategies]` before a run starts.

use std::collections::HashMap;

use crate::domain::error::StratbenchError;
use crate::domain::strategy::{slug, StrategyConfig, StrategyKind};
use crate::ports::config_port::ConfigPort;

pub const BACKTEST_SECTION: &str = "backtest";
pub const STRATEGIES_SECTION: &str = "strategies";
/// Band multipliers are keyed in hundredths; anything smaller collapses the
/// bands onto the middle line.
pub const MIN_STDDEV_MULT: f64 = 0.01;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    validate_initial_capital(config)?;
    validate_position_size(config)?;
    validate_bars_per_year(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

/// Parses every listed strategy section; absent `[strategies]` means the
/// built-in defaults, which are always valid.
///
/// Two strategies whose display names reduce to the same file slug would
/// overwrite each other's report files, so that is rejected too.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    for section in strategy_sections(config)? {
        let name = parse_strategy_section(config, &section)?.build().name();
        if let Some(first) = seen.insert(slug(&name), section.clone()) {
            return Err(StratbenchError::config_invalid(
                &section,
                "name",
                format!(
                    "strategy name '{}' collides with section [{}]; set a distinct name",
                    name, first
                ),
            ));
        }
    }
    Ok(())
}

/// Section names listed under `[strategies] names`, or an empty list when
/// the section is absent.
pub fn strategy_sections(config: &dyn ConfigPort) -> Result<Vec<String>, StratbenchError> {
    if !config.has_section(STRATEGIES_SECTION) {
        return Ok(Vec::new());
    }
    let names = config.get_list(STRATEGIES_SECTION, "names");
    if names.is_empty() {
        return Err(StratbenchError::ConfigMissing {
            section: STRATEGIES_SECTION.to_string(),
            key: "names".to_string(),
        });
    }
    Ok(names)
}

pub fn parse_strategy_section(
    config: &dyn ConfigPort,
    section: &str,
) -> Result<StrategyConfig, StratbenchError> {
    if !config.has_section(section) {
        return Err(StratbenchError::ConfigMissing {
            section: section.to_string(),
            key: "kind".to_string(),
        });
    }
    let kind_name = config
        .get_string(section, "kind")
        .ok_or_else(|| StratbenchError::ConfigMissing {
            section: section.to_string(),
            key: "kind".to_string(),
        })?;

    let kind = match kind_name.to_lowercase().as_str() {
        "sma_crossover" => {
            let short = read_period(config, section, "short", 20)?;
            let long = read_period(config, section, "long", 50)?;
            if short >= long {
                return Err(StratbenchError::config_invalid(
                    section,
                    "short",
                    format!("short period {} must be less than long period {}", short, long),
                ));
            }
            StrategyKind::SmaCrossover { short, long }
        }
        "rsi" => {
            let period = read_period(config, section, "period", 14)?;
            let oversold = read_f64(config, section, "oversold", 30.0)?;
            let overbought = read_f64(config, section, "overbought", 70.0)?;
            if oversold < 0.0 || overbought > 100.0 || oversold >= overbought {
                return Err(StratbenchError::config_invalid(
                    section,
                    "oversold",
                    format!(
                        "thresholds must satisfy 0 <= oversold < overbought <= 100, got {}/{}",
                        oversold, overbought
                    ),
                ));
            }
            StrategyKind::RsiThreshold {
                period,
                oversold,
                overbought,
            }
        }
        "bollinger" => {
            let (period, stddev_mult) = read_band_params(config, section)?;
            StrategyKind::BollingerReversion {
                period,
                stddev_mult,
            }
        }
        "mean_reversion" => {
            let (period, stddev_mult) = read_band_params(config, section)?;
            StrategyKind::BandLevel {
                period,
                stddev_mult,
            }
        }
        other => {
            return Err(StratbenchError::config_invalid(
                section,
                "kind",
                format!(
                    "unknown strategy kind '{}' (expected sma_crossover, rsi, bollinger or mean_reversion)",
                    other
                ),
            ));
        }
    };

    Ok(StrategyConfig {
        name: config.get_string(section, "name"),
        kind,
    })
}

/// Numeric value or `default` when absent; present but unparseable values
/// are rejected instead of silently defaulted.
pub fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, StratbenchError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(StratbenchError::config_invalid(
                section,
                key,
                format!("'{}' is not a number", raw),
            )),
        },
    }
}

fn read_band_params(config: &dyn ConfigPort, section: &str) -> Result<(usize, f64), StratbenchError> {
    let period = read_period(config, section, "period", 20)?;
    let stddev_mult = read_f64(config, section, "stddev", 2.0)?;
    if stddev_mult < MIN_STDDEV_MULT {
        return Err(StratbenchError::config_invalid(
            section,
            "stddev",
            format!("stddev must be at least {}, got {}", MIN_STDDEV_MULT, stddev_mult),
        ));
    }
    Ok((period, stddev_mult))
}

fn read_period(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, StratbenchError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    match raw.parse::<usize>() {
        Ok(0) => Err(StratbenchError::config_invalid(
            section,
            key,
            "period must be positive",
        )),
        Ok(v) => Ok(v),
        Err(_) => Err(StratbenchError::config_invalid(
            section,
            key,
            format!("'{}' is not a positive integer", raw),
        )),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    let value = read_f64(config, BACKTEST_SECTION, "initial_capital", 10_000.0)?;
    if value <= 0.0 {
        return Err(StratbenchError::config_invalid(
            BACKTEST_SECTION,
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    let value = read_f64(config, BACKTEST_SECTION, "position_size", 0.95)?;
    if value <= 0.0 || value > 1.0 {
        return Err(StratbenchError::config_invalid(
            BACKTEST_SECTION,
            "position_size",
            "position_size must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_bars_per_year(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    let value = read_f64(config, BACKTEST_SECTION, "bars_per_year", 252.0)?;
    if value <= 0.0 {
        return Err(StratbenchError::config_invalid(
            BACKTEST_SECTION,
            "bars_per_year",
            "bars_per_year must be positive",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    let value = read_f64(config, BACKTEST_SECTION, "risk_free_rate", 0.0)?;
    if !(0.0..1.0).contains(&value) {
        return Err(StratbenchError::config_invalid(
            BACKTEST_SECTION,
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}
