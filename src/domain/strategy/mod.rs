//! Strategy configuration and the concrete signal generators.

pub mod sma_crossover;
pub mod rsi_threshold;
pub mod bollinger_reversion;
pub mod band_level;

use tracing::warn;

use crate::domain::indicator::{IndicatorProvider, IndicatorSeries, IndicatorType};
use crate::domain::signal::{GeneratedSignals, SignalGenerator};

pub use band_level::BandLevelReversion;
pub use bollinger_reversion::BollingerReversion;
pub use rsi_threshold::RsiThreshold;
pub use sma_crossover::SmaCrossover;

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyKind {
    SmaCrossover {
        short: usize,
        long: usize,
    },
    RsiThreshold {
        period: usize,
        oversold: f64,
        overbought: f64,
    },
    BollingerReversion {
        period: usize,
        stddev_mult: f64,
    },
    BandLevel {
        period: usize,
        stddev_mult: f64,
    },
}

/// One strategy entry from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    /// Display name override; generators fall back to a name built from
    /// their parameters.
    pub name: Option<String>,
    pub kind: StrategyKind,
}

impl StrategyConfig {
    pub fn new(kind: StrategyKind) -> Self {
        StrategyConfig { name: None, kind }
    }

    pub fn build(&self) -> Box<dyn SignalGenerator> {
        let label = self.name.clone();
        match self.kind {
            StrategyKind::SmaCrossover { short, long } => Box::new(SmaCrossover {
                short,
                long,
                label,
            }),
            StrategyKind::RsiThreshold {
                period,
                oversold,
                overbought,
            } => Box::new(RsiThreshold {
                period,
                oversold,
                overbought,
                label,
            }),
            StrategyKind::BollingerReversion {
                period,
                stddev_mult,
            } => Box::new(BollingerReversion {
                period,
                stddev_mult,
                label,
            }),
            StrategyKind::BandLevel {
                period,
                stddev_mult,
            } => Box::new(BandLevelReversion {
                period,
                stddev_mult,
                label,
            }),
        }
    }
}

/// The line-up compared when no strategies are configured.
pub fn default_strategies() -> Vec<StrategyConfig> {
    vec![
        StrategyConfig::new(StrategyKind::SmaCrossover { short: 20, long: 50 }),
        StrategyConfig::new(StrategyKind::SmaCrossover {
            short: 50,
            long: 200,
        }),
        StrategyConfig::new(StrategyKind::RsiThreshold {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }),
        StrategyConfig::new(StrategyKind::BollingerReversion {
            period: 20,
            stddev_mult: 2.0,
        }),
    ]
}

/// File-name-safe form of a strategy name: lowercase alphanumerics joined
/// by single underscores.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("strategy");
    }
    out
}

/// Look up every required indicator, or return the ones that are absent.
pub(crate) fn lookup<'p>(
    provider: &'p dyn IndicatorProvider,
    required: &[IndicatorType],
) -> Result<Vec<&'p IndicatorSeries>, Vec<IndicatorType>> {
    let mut found = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for ty in required {
        match provider.indicator(ty) {
            Some(series) => found.push(series),
            None => missing.push(*ty),
        }
    }
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(missing)
    }
}

pub(crate) fn degraded(name: &str, len: usize, missing: Vec<IndicatorType>) -> GeneratedSignals {
    let names: Vec<String> = missing.iter().map(|ty| ty.to_string()).collect();
    warn!(
        strategy = name,
        missing = %names.join(", "),
        "indicators not available, emitting HOLD for every bar"
    );
    GeneratedSignals::all_hold(len, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_line_up_names() {
        let names: Vec<String> = default_strategies().iter().map(|c| c.build().name()).collect();
        assert_eq!(
            names,
            vec![
                "SMA Crossover 20/50",
                "SMA Crossover 50/200",
                "RSI 14 (30/70)",
                "Bollinger Bands 20 (2)",
            ]
        );
    }

    #[test]
    fn name_override() {
        let config = StrategyConfig {
            name: Some("Golden Cross".into()),
            kind: StrategyKind::SmaCrossover {
                short: 50,
                long: 200,
            },
        };
        assert_eq!(config.build().name(), "Golden Cross");
    }

    #[test]
    fn band_level_kind_builds_mean_reversion() {
        let generator = StrategyConfig::new(StrategyKind::BandLevel {
            period: 20,
            stddev_mult: 2.0,
        })
        .build();
        assert_eq!(generator.name(), "Mean Reversion 20 (2)");
        assert_eq!(
            generator.required_indicators(),
            vec![IndicatorType::bollinger(20, 2.0)]
        );
    }

    #[test]
    fn slug_normalizes_names() {
        assert_eq!(slug("SMA Crossover 20/50"), "sma_crossover_20_50");
        assert_eq!(slug("Bollinger Bands 20 (2.5)"), "bollinger_bands_20_2_5");
        assert_eq!(slug("  RSI  "), "rsi");
        assert_eq!(slug("///"), "strategy");
    }

    #[test]
    fn default_line_up_has_distinct_slugs() {
        let mut slugs: Vec<String> = default_strategies()
            .iter()
            .map(|c| slug(&c.build().name()))
            .collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), 4);
    }

    #[test]
    fn built_generators_report_requirements() {
        let config = StrategyConfig::new(StrategyKind::BollingerReversion {
            period: 20,
            stddev_mult: 2.5,
        });
        assert_eq!(
            config.build().required_indicators(),
            vec![IndicatorType::bollinger(20, 2.5)]
        );
    }
}
