// packages/sniffer/src/interception/dispatch.rs
//! Observer dispatch
//!
//! Exchanges are handed to the handler synchronously, on the thread that
//! issued the intercepted call. The call does not continue until the
//! handler returns, and a handler error becomes the call's error.

use crate::capture::exchange::CapturedExchange;
use crate::utils::errors::{Result, SnifferError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Observer of captured exchanges
pub trait Handler: Send + Sync {
    fn call(&self, exchange: &CapturedExchange) -> anyhow::Result<()>;
}

/// Shared handlers stay owned by the caller; a scope only holds a clone
impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, exchange: &CapturedExchange) -> anyhow::Result<()> {
        (**self).call(exchange)
    }
}

/// Handler backed by a closure, see [`handler_fn`]
#[derive(Clone)]
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&CapturedExchange) -> anyhow::Result<()> + Send + Sync,
{
    fn call(&self, exchange: &CapturedExchange) -> anyhow::Result<()> {
        (self.0)(exchange)
    }
}

/// Wrap a closure as a [`Handler`]
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&CapturedExchange) -> anyhow::Result<()> + Send + Sync,
{
    FnHandler(f)
}

/// Delivers exchanges to one handler
pub struct Dispatcher {
    handler: Arc<dyn Handler>,
    dispatched: AtomicU64,
}

impl Dispatcher {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Invoke the handler with `exchange`; the exchange is dropped afterwards
    pub fn dispatch(&self, exchange: CapturedExchange) -> Result<()> {
        let seq = self.dispatched.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Dispatching exchange #{}: {} {}",
            seq, exchange.method, exchange.path
        );
        metrics::counter!("sniffer_exchanges_dispatched_total").increment(1);

        self.handler
            .call(&exchange)
            .map_err(SnifferError::HandlerFailed)
    }

    /// Number of exchanges dispatched so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}
