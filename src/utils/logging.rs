//! Tracing subscriber bootstrap

use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;
use crate::ports::LogLevel;

/// Filter directive: `RUST_LOG` when set, otherwise `level`
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber, writing to stderr so stdout stays free
/// for command output and JSON events.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(level: LogLevel, json: bool) -> Result<(), DomainError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| DomainError::InternalError(format!("Failed to initialise logging: {}", e)))?;

    tracing::debug!(level = level.as_str(), json, "Logging initialised");
    Ok(())
}
