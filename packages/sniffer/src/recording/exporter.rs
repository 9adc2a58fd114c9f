// packages/sniffer/src/recording/exporter.rs
//! Export captured exchanges
//!
//! Supports:
//! - JSON (for analysis, visualization)
//! - YAML (fixture files compared by test tooling)

use crate::capture::exchange::CapturedExchange;
use crate::utils::errors::{Result, SnifferError};
use tracing::debug;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format
    Json,

    /// YAML format
    Yaml,
}

/// Exporter for captured exchanges
pub struct Exporter {
    format: ExportFormat,
    include_responses: bool,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            include_responses: true,
        }
    }

    /// Keep only the request leg (`method`, `path`, `query`, `headers`, `body`)
    pub fn requests_only(mut self) -> Self {
        self.include_responses = false;
        self
    }

    /// Export a list of exchanges
    pub fn export(&self, exchanges: &[CapturedExchange]) -> Result<String> {
        debug!("Exporting {} exchanges to {:?} format", exchanges.len(), self.format);

        let docs: Vec<CapturedExchange> = exchanges.iter().map(|e| self.prepare(e)).collect();
        self.render(&docs)
    }

    /// Export a single exchange as one fixture document
    pub fn export_one(&self, exchange: &CapturedExchange) -> Result<String> {
        self.render(&self.prepare(exchange))
    }

    fn prepare(&self, exchange: &CapturedExchange) -> CapturedExchange {
        let mut doc = exchange.clone();
        if !self.include_responses {
            doc.response = None;
            doc.error = None;
        }
        doc
    }

    fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        match self.format {
            ExportFormat::Json => serde_json::to_string_pretty(value).map_err(|e| {
                SnifferError::ExportFailed(format!("JSON serialization error: {}", e))
            }),
            ExportFormat::Yaml => serde_yaml::to_string(value).map_err(|e| {
                SnifferError::ExportFailed(format!("YAML serialization error: {}", e))
            }),
        }
    }
}
