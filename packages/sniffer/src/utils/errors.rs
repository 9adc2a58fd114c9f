// packages/sniffer/src/utils/errors.rs
//! Error types for the sniffer
//!
//! Transport and handler failures are surfaced to the code that issued the
//! intercepted call. Body decoding problems never show up here; the
//! normalizer degrades them to a raw body instead.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the sniffer
#[derive(Debug, Error)]
pub enum SnifferError {
    /// The underlying transport could not complete the call
    #[error("Transport failed: {0}")]
    TransportFailed(String),

    /// The underlying transport did not answer in time
    #[error("Transport timed out after {0:?}")]
    TransportTimeout(Duration),

    /// The observer's handler returned an error
    #[error("Handler failed: {0:#}")]
    HandlerFailed(anyhow::Error),

    /// A request could not be built or is not sendable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Scope stack discipline was violated
    #[error("Scope misuse: {0}")]
    ScopeMisuse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl SnifferError {
    /// Whether the error originated in the transport rather than the sniffer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SnifferError::TransportFailed(_) | SnifferError::TransportTimeout(_)
        )
    }
}

impl From<config::ConfigError> for SnifferError {
    fn from(e: config::ConfigError) -> Self {
        SnifferError::ConfigError(e.to_string())
    }
}

impl From<hyper::http::Error> for SnifferError {
    fn from(e: hyper::http::Error) -> Self {
        SnifferError::InvalidRequest(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnifferError>;
