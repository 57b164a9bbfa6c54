//! Domain error types.

use crate::domain::indicator::IndicatorType;

/// Top-level error type for stratbench.
#[derive(Debug, thiserror::Error)]
pub enum StratbenchError {
    #[error("failed to load {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("indicator {indicator} unavailable for a series of {bars} bars")]
    IndicatorUnavailable {
        indicator: IndicatorType,
        bars: usize,
    },

    #[error("simulation invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StratbenchError {
    pub(crate) fn load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        StratbenchError::Load {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        StratbenchError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        StratbenchError::InvariantViolation {
            reason: reason.into(),
        }
    }
}

impl From<&StratbenchError> for std::process::ExitCode {
    fn from(err: &StratbenchError) -> Self {
        let code: u8 = match err {
            StratbenchError::Io(_) | StratbenchError::Csv(_) => 1,
            StratbenchError::ConfigParse { .. }
            | StratbenchError::ConfigMissing { .. }
            | StratbenchError::ConfigInvalid { .. } => 2,
            StratbenchError::Load { .. } => 3,
            StratbenchError::IndicatorUnavailable { .. } => 4,
            StratbenchError::InvariantViolation { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
