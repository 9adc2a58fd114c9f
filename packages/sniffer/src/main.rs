// packages/sniffer/src/main.rs
//! Sentra Lab Sniffer
//!
//! Issues a single GET inside an interception scope and prints the captured
//! exchange as a YAML fixture document.

use anyhow::{Context, Result};
use sentra_lab_sniffer::interception::{replace_default_transport, HttpTransport};
use sentra_lab_sniffer::observability::init_tracing;
use sentra_lab_sniffer::{client, ExchangeRecorder, ExportFormat, Exporter, Scope, SnifferConfig};
use std::sync::Arc;
use tracing::{error, info};

fn main() -> Result<()> {
    let config = SnifferConfig::load()?;
    init_tracing(&config.log)?;

    info!("Starting Sentra Lab Sniffer v{}", env!("CARGO_PKG_VERSION"));

    let url = std::env::args()
        .nth(1)
        .context("usage: sentra-lab-sniffer <url>")?;

    let _default = replace_default_transport(Arc::new(HttpTransport::new(config.transport.clone())?));

    let recorder = ExchangeRecorder::new();
    let outcome = Scope::new(recorder.clone())
        .capture(config.capture.clone())
        .run(|| client::get(&url));

    if let Err(e) = &outcome {
        error!("Request failed: {}", e);
    }

    let exporter = Exporter::new(ExportFormat::Yaml);
    for exchange in recorder.take() {
        print!("{}", exporter.export_one(&exchange)?);
    }

    outcome.map(|_| ()).map_err(Into::into)
}
