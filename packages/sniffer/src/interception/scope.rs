// packages/sniffer/src/interception/scope.rs
//! Scope controller
//!
//! A scope installs a fresh shim as the calling thread's active transport
//! for the dynamic extent of a block and restores the previous one when the
//! block ends, whether it returns normally, returns an error or panics.
//!
//! # State machine
//!
//! ```text
//! Idle ──enter──→ Active(shim, prior) ──guard dropped──→ Idle (prior restored)
//! ```
//!
//! Scopes nest with stack discipline. A nested shim takes over the
//! enclosing shim's upstream, so every handler sees exactly the traffic
//! issued inside its own block and nothing else. The stack is thread-local;
//! scopes on different threads never see each other's traffic.

use crate::interception::dispatch::Handler;
use crate::interception::shim::{ShimMode, TransportShim};
use crate::interception::transport::{RawRequest, RawResponse, Transport};
use crate::utils::config::CaptureConfig;
use crate::utils::errors::{Result, SnifferError};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error};

thread_local! {
    static ACTIVE_SHIMS: RefCell<Vec<Arc<TransportShim>>> = const { RefCell::new(Vec::new()) };
}

/// Innermost shim installed on the calling thread
pub(crate) fn active_shim() -> Option<Arc<TransportShim>> {
    ACTIVE_SHIMS.with(|stack| stack.borrow().last().cloned())
}

/// Number of scopes currently open on the calling thread
pub fn scope_depth() -> usize {
    ACTIVE_SHIMS.with(|stack| stack.borrow().len())
}

/// Whether calls from this thread are currently intercepted
pub fn is_intercepted() -> bool {
    scope_depth() > 0
}

/// Run `block` with every HTTP call it makes reported to `handler`
pub fn with_scope<H, F, R>(handler: H, block: F) -> R
where
    H: Handler + 'static,
    F: FnOnce() -> R,
{
    Scope::new(handler).run(block)
}

/// Builder for an interception scope
pub struct Scope {
    handler: Arc<dyn Handler>,
    mode: Option<ShimMode>,
    capture: CaptureConfig,
}

impl Scope {
    /// Create a new scope reporting to `handler`
    ///
    /// Pass an `Arc<H>` to keep ownership of the handler and inspect it
    /// once the scope has ended.
    pub fn new<H: Handler + 'static>(handler: H) -> Self {
        Self::with_shared(Arc::new(handler))
    }

    /// Create a new scope reporting to an already shared handler
    pub fn with_shared(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            mode: None,
            capture: CaptureConfig::default(),
        }
    }

    /// Forward intercepted calls to `transport` instead of the inherited upstream
    pub fn forward_to(mut self, transport: Arc<dyn Transport>) -> Self {
        self.mode = Some(ShimMode::Forward(transport));
        self
    }

    /// Answer intercepted calls with synthetic responses
    pub fn respond_with<F>(mut self, responder: F) -> Self
    where
        F: Fn(&RawRequest) -> Result<RawResponse> + Send + Sync + 'static,
    {
        self.mode = Some(ShimMode::Respond(Arc::new(responder)));
        self
    }

    /// Control what gets recorded from intercepted traffic (e.g. header redaction)
    pub fn capture(mut self, config: CaptureConfig) -> Self {
        self.capture = config;
        self
    }

    /// Install the shim; it stays active until the guard is dropped
    pub fn enter(self) -> ScopeGuard {
        let mode = self.mode.unwrap_or_else(|| {
            active_shim()
                .map(|outer| outer.mode().clone())
                .unwrap_or(ShimMode::Default)
        });

        let shim = Arc::new(TransportShim::new(mode, self.handler, self.capture));
        let depth = ACTIVE_SHIMS.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(Arc::clone(&shim));
            stack.len()
        });

        metrics::counter!("sniffer_scopes_entered_total").increment(1);
        debug!("Entered interception scope (depth {}, upstream {:?})", depth, shim.mode());

        ScopeGuard {
            shim,
            _not_send: PhantomData,
        }
    }

    /// Run `block` inside the scope and return its result
    pub fn run<F, R>(self, block: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.enter();
        block()
    }
}

/// Active scope; dropping it restores the previously active transport
#[must_use = "the scope ends as soon as the guard is dropped"]
pub struct ScopeGuard {
    shim: Arc<TransportShim>,
    // Bound to the thread whose stack it was pushed on
    _not_send: PhantomData<*const ()>,
}

impl ScopeGuard {
    /// Number of exchanges dispatched by this scope so far
    pub fn dispatched(&self) -> u64 {
        self.shim.dispatched()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let in_order = ACTIVE_SHIMS.with(|stack| {
            let mut stack = stack.borrow_mut();
            match stack.last() {
                Some(top) if Arc::ptr_eq(top, &self.shim) => {
                    stack.pop();
                    true
                }
                _ => {
                    if let Some(pos) = stack.iter().rposition(|s| Arc::ptr_eq(s, &self.shim)) {
                        stack.remove(pos);
                    }
                    false
                }
            }
        });

        if in_order {
            debug!(
                "Left interception scope ({} exchanges dispatched)",
                self.shim.dispatched()
            );
            return;
        }

        let err = SnifferError::ScopeMisuse(
            "scope released while an inner scope was still active".to_string(),
        );
        error!("{}", err);
        if !std::thread::panicking() {
            panic!("{}", err);
        }
    }
}
