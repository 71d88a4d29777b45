//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured filter. Logs go to stderr so page
//! output on stdout stays clean.

use crate::config::LogConfig;
use crate::error::CliError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(config: &LogConfig) -> Result<(), CliError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| CliError::Telemetry(format!("invalid log.filter: {e}")))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|e| CliError::Telemetry(e.to_string()))?;

    tracing::debug!(filter = %config.filter, json = config.json, "logging initialized");
    Ok(())
}
