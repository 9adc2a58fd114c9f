// packages/sniffer/src/capture/mod.rs
//! Canonical capture model and normalization
//!
//! Everything that crosses the interception seam is turned into one stable
//! structured shape before it reaches an observer:
//!
//! - **Exchange**: `CapturedExchange` / `CapturedResponse` records
//! - **Normalizer**: content-type driven body decoding, query and header
//!   canonicalization
//!
//! # Body decoding
//!
//! ```text
//! raw body ─┬─ empty ─────────────────────────────→ Empty
//!           ├─ application/x-www-form-urlencoded ─→ Form([(k, v), ...])
//!           ├─ application/json, text/json, +json → Json(value)
//!           └─ anything else / decode failure ────→ Raw(string)
//! ```

pub mod exchange;
pub mod normalizer;

// Re-export commonly used types
pub use exchange::{CapturedExchange, CapturedResponse, Headers, NormalizedBody, QueryPairs};
pub use normalizer::{capture_request, capture_response, normalize, normalize_headers, parse_query};
