// packages/sniffer/src/lib.rs
//! Sentra Lab Sniffer Library
//!
//! Scoped HTTP traffic interception. Inside a scope, every request sent
//! through the sniffer's transport seam is captured, normalized into a
//! [`CapturedExchange`] and handed to an observer before the response is
//! returned to the caller.
//!
//! ```no_run
//! use sentra_lab_sniffer::{client, with_scope, ExchangeRecorder};
//!
//! let recorder = ExchangeRecorder::new();
//! with_scope(recorder.clone(), || client::get("http://localhost:4567/?lang=ruby"))?;
//!
//! let exchange = recorder.last().unwrap();
//! assert_eq!(exchange.query_param("lang"), Some("ruby"));
//! # Ok::<(), sentra_lab_sniffer::SnifferError>(())
//! ```
//!
//! # Architecture
//!
//! - **capture**: canonical exchange model and body normalization
//! - **interception**: transport seam, shim, scope controller, dispatch
//! - **recording**: recorder handler and fixture export
//! - **observability**: tracing setup
//! - **utils**: errors, configuration, serde helpers

// Public module exports
pub mod capture;
pub mod interception;
pub mod observability;
pub mod recording;
pub mod utils;

// Re-export commonly used types
pub use capture::{CapturedExchange, CapturedResponse, NormalizedBody};
pub use interception::{client, handler_fn, send, with_scope, Handler, Scope, Transport};
pub use recording::{ExchangeRecorder, ExportFormat, Exporter};
pub use utils::config::SnifferConfig;
pub use utils::errors::{Result, SnifferError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
