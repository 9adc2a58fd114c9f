// packages/sniffer/src/interception/mod.rs
//! Scoped HTTP interception
//!
//! Application code sends requests through one narrow primitive,
//! [`transport::send`]. Outside of any scope that goes straight to the
//! process-wide default transport. Inside a scope it goes to the scope's
//! shim, which captures the exchange and hands it to the observer:
//!
//! - **Transport**: the `Transport` seam, default slot and `send` entry point
//! - **HTTP Transport**: the real network transport (hyper, plain HTTP)
//! - **Shim**: capture + forward (or short-circuit) + dispatch
//! - **Scope**: per-thread install/restore of shims with stack discipline
//! - **Dispatch**: synchronous hand-off to the registered `Handler`
//! - **Client**: thin request helpers built on `transport::send`
//!
//! # Architecture
//!
//! ```text
//! Application Code
//!     │
//!     └─ transport::send(req)
//!            │
//!            ├─ no scope ──→ default transport ──→ network
//!            │
//!            └─ in scope ──→ TransportShim
//!                               ├─ capture request
//!                               ├─ upstream (real transport / responder)
//!                               ├─ capture response
//!                               └─ Dispatcher → Handler::call(&exchange)
//! ```

pub mod client;
pub mod dispatch;
pub mod http_transport;
pub mod scope;
pub mod shim;
pub mod transport;

// Re-export commonly used types
pub use dispatch::{handler_fn, Dispatcher, FnHandler, Handler};
pub use http_transport::HttpTransport;
pub use scope::{is_intercepted, scope_depth, with_scope, Scope, ScopeGuard};
pub use shim::{Responder, ShimMode, TransportShim};
pub use transport::{
    default_transport, replace_default_transport, send, set_default_transport,
    DefaultTransportGuard, RawRequest, RawResponse, Transport,
};
