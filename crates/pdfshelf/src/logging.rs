//! Process-wide tracing setup.
//!
//! `RUST_LOG` takes precedence over the configured filter. Records emitted
//! through the `log` facade are forwarded into tracing.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::ShelfError;

/// Builds the filter from `RUST_LOG`, falling back to `config.filter`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ShelfError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|e| ShelfError::Logging(format!("invalid filter '{}': {}", config.filter, e)))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ShelfError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().with_target(true)))
        }
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_current_span(true)),
        ),
    };
    installed.map_err(|e| ShelfError::Logging(e.to_string()))?;

    tracing_log::LogTracer::init().map_err(|e| ShelfError::Logging(e.to_string()))?;

    tracing::debug!(format = ?config.format, "Logging initialized");
    Ok(())
}
