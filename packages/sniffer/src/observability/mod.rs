// packages/sniffer/src/observability/mod.rs
//! Tracing setup
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies.

use crate::utils::config::LogConfig;
use crate::utils::errors::{Result, SnifferError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Install the global tracing subscriber
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| SnifferError::ConfigError(format!("Invalid log level {:?}: {}", config.level, e)))?;

    let registry = Registry::default().with(filter);

    let result = if config.json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    result.map_err(|e| SnifferError::ConfigError(format!("Failed to install tracing subscriber: {}", e)))
}
