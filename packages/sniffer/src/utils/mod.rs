// packages/sniffer/src/utils/mod.rs
//! Common utilities shared across the sniffer
//!
//! - **errors**: crate-wide error type and `Result` alias
//! - **config**: layered configuration (defaults, file, environment)
//! - **serde_helpers**: serde adapters for `http` types

pub mod config;
pub mod errors;
pub mod serde_helpers;

pub use config::{CaptureConfig, LogConfig, SnifferConfig, TransportConfig};
pub use errors::{Result, SnifferError};
