//! Tracing subscriber setup
//!
//! Installs a global `tracing-subscriber` registry with an `EnvFilter` and a
//! text or JSON formatting layer. Output goes to stderr so command output on
//! stdout stays machine-readable.

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::InfrastructureError;

/// Build the event filter
///
/// `RUST_LOG` wins over the configured level when it is set and valid.
///
/// # Errors
///
/// Returns `InfrastructureError::Telemetry` when the configured directives
/// cannot be parsed.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| InfrastructureError::Telemetry(format!("invalid level '{}': {e}", config.level)))
}

/// Initialize global tracing
///
/// # Errors
///
/// Returns `InfrastructureError::Telemetry` for an invalid filter or when a
/// global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .try_init(),
    };
    result.map_err(|e| InfrastructureError::Telemetry(e.to_string()))?;

    info!(level = %config.level, format = %config.format, "Tracing initialized");
    Ok(())
}
