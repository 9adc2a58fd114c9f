// packages/sniffer/src/interception/transport.rs
//! The transport seam
//!
//! Code that wants its traffic to be observable sends requests through
//! [`send`] instead of talking to a client library directly. The active
//! transport is resolved per call: the innermost scope's shim on the
//! calling thread, or the process-wide default.

use crate::interception::http_transport::HttpTransport;
use crate::interception::scope;
use crate::utils::config::TransportConfig;
use crate::utils::errors::Result;
use bytes::Bytes;
use hyper::{Request, Response};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Fully buffered outbound request
pub type RawRequest = Request<Bytes>;

/// Fully buffered response
pub type RawResponse = Response<Bytes>;

/// Anything able to turn a raw request into a raw response
pub trait Transport: Send + Sync {
    fn send(&self, request: RawRequest) -> Result<RawResponse>;
}

static DEFAULT_TRANSPORT: Lazy<RwLock<Option<Arc<dyn Transport>>>> =
    Lazy::new(|| RwLock::new(None));

/// Send a request through the active transport of the calling thread
pub fn send(request: RawRequest) -> Result<RawResponse> {
    match scope::active_shim() {
        Some(shim) => shim.send(request),
        None => {
            debug!("No active scope, sending {} {} directly", request.method(), request.uri());
            default_transport()?.send(request)
        }
    }
}

/// The process-wide default transport, built on first use
pub fn default_transport() -> Result<Arc<dyn Transport>> {
    if let Some(transport) = DEFAULT_TRANSPORT.read().as_ref() {
        return Ok(Arc::clone(transport));
    }

    let mut slot = DEFAULT_TRANSPORT.write();
    if let Some(transport) = slot.as_ref() {
        return Ok(Arc::clone(transport));
    }

    info!("Initializing default HTTP transport");
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(TransportConfig::default())?);
    *slot = Some(Arc::clone(&transport));
    Ok(transport)
}

/// Install `transport` as the process-wide default, returning the previous one
pub fn set_default_transport(transport: Arc<dyn Transport>) -> Option<Arc<dyn Transport>> {
    DEFAULT_TRANSPORT.write().replace(transport)
}

/// Install `transport` as the default until the returned guard is dropped
pub fn replace_default_transport(transport: Arc<dyn Transport>) -> DefaultTransportGuard {
    DefaultTransportGuard {
        previous: set_default_transport(transport),
    }
}

/// Restores the previous default transport on drop
#[must_use = "the previous default is restored as soon as the guard is dropped"]
pub struct DefaultTransportGuard {
    previous: Option<Arc<dyn Transport>>,
}

impl Drop for DefaultTransportGuard {
    fn drop(&mut self) {
        *DEFAULT_TRANSPORT.write() = self.previous.take();
    }
}
