//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `--log-level`.
pub const LOG_ENV: &str = "STRATBENCH_LOG";

/// Build the filter from `STRATBENCH_LOG`, falling back to `log_level`.
pub fn build_filter(log_level: &str) -> Result<EnvFilter, String> {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| log_level.to_string());
    EnvFilter::try_new(filter).map_err(|err| format!("invalid log filter: {err}"))
}

/// Install a fmt subscriber writing to stderr; stdout is reserved for reports.
pub fn init_tracing(log_level: &str) -> Result<(), String> {
    let env_filter = build_filter(log_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
