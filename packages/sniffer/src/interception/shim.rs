// packages/sniffer/src/interception/shim.rs
//! Transport shim
//!
//! Stands in for the real transport while a scope is active. Every call
//! produces exactly one dispatched exchange. The upstream response (or
//! error) is returned to the caller untouched.

use crate::capture::normalizer::{capture_request, capture_response};
use crate::interception::dispatch::{Dispatcher, Handler};
use crate::interception::transport::{self, RawRequest, RawResponse, Transport};
use crate::utils::config::CaptureConfig;
use crate::utils::errors::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces synthetic responses instead of hitting the network
pub type Responder = Arc<dyn Fn(&RawRequest) -> Result<RawResponse> + Send + Sync>;

/// Where a shim gets its responses from
#[derive(Clone)]
pub enum ShimMode {
    /// Process-wide default transport, resolved per call
    Default,

    /// An explicit real transport
    Forward(Arc<dyn Transport>),

    /// Synthetic responses; nothing reaches the network
    Respond(Responder),
}

impl std::fmt::Debug for ShimMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShimMode::Default => f.write_str("Default"),
            ShimMode::Forward(_) => f.write_str("Forward"),
            ShimMode::Respond(_) => f.write_str("Respond"),
        }
    }
}

/// Capturing transport installed by a scope
pub struct TransportShim {
    mode: ShimMode,
    dispatcher: Dispatcher,
    capture: CaptureConfig,
}

impl TransportShim {
    /// Create a new shim reporting to `handler`
    pub fn new(mode: ShimMode, handler: Arc<dyn Handler>, capture: CaptureConfig) -> Self {
        Self {
            mode,
            dispatcher: Dispatcher::new(handler),
            capture,
        }
    }

    /// Upstream used by this shim; nested scopes inherit it
    pub fn mode(&self) -> &ShimMode {
        &self.mode
    }

    /// Number of exchanges this shim has dispatched
    pub fn dispatched(&self) -> u64 {
        self.dispatcher.dispatched()
    }

    fn upstream(&self, request: RawRequest) -> Result<RawResponse> {
        match &self.mode {
            ShimMode::Default => transport::default_transport()?.send(request),
            ShimMode::Forward(inner) => inner.send(request),
            ShimMode::Respond(responder) => responder(&request),
        }
    }
}

impl Transport for TransportShim {
    fn send(&self, request: RawRequest) -> Result<RawResponse> {
        debug!("Intercepted request: {} {}", request.method(), request.uri());

        let mut exchange = capture_request(&request, &self.capture);

        match self.upstream(request) {
            Ok(response) => {
                exchange.response = Some(capture_response(&response, &self.capture));
                self.dispatcher.dispatch(exchange)?;
                Ok(response)
            }
            Err(e) => {
                metrics::counter!("sniffer_transport_failures_total").increment(1);
                exchange.error = Some(e.to_string());

                if let Err(handler_err) = self.dispatcher.dispatch(exchange) {
                    warn!("Handler failed while reporting transport error: {}", handler_err);
                }
                Err(e)
            }
        }
    }
}
