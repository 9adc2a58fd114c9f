// packages/sniffer/src/recording/recorder.rs
//! In-memory exchange recorder
//!
//! Cloning a recorder is cheap and every clone shares the same log, so one
//! clone can be handed to a scope while the test keeps another to inspect.

use crate::capture::exchange::CapturedExchange;
use crate::interception::dispatch::Handler;
use parking_lot::Mutex;
use std::sync::Arc;

/// Handler that records every exchange it receives
#[derive(Debug, Clone, Default)]
pub struct ExchangeRecorder {
    exchanges: Arc<Mutex<Vec<CapturedExchange>>>,
}

impl ExchangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn exchanges(&self) -> Vec<CapturedExchange> {
        self.exchanges.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<CapturedExchange> {
        std::mem::take(&mut *self.exchanges.lock())
    }

    pub fn last(&self) -> Option<CapturedExchange> {
        self.exchanges.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.exchanges.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.lock().is_empty()
    }
}

impl Handler for ExchangeRecorder {
    fn call(&self, exchange: &CapturedExchange) -> anyhow::Result<()> {
        self.exchanges.lock().push(exchange.clone());
        Ok(())
    }
}
