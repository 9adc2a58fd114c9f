// packages/sniffer/src/recording/mod.rs
//! Recording helpers for captured traffic
//!
//! The interception core keeps no history. These helpers live on the
//! observer side of the seam:
//!
//! - **Recorder**: a `Handler` that keeps every exchange, in order
//! - **Exporter**: renders exchanges as JSON or YAML fixture documents

pub mod exporter;
pub mod recorder;

// Re-export commonly used types
pub use exporter::{ExportFormat, Exporter};
pub use recorder::ExchangeRecorder;
