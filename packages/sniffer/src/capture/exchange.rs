// packages/sniffer/src/capture/exchange.rs
//! Canonical request/response records
//!
//! A `CapturedExchange` is deterministic: capturing the same raw request
//! twice yields equal values. It serializes to the fixture document shape
//! `{method, path, query, headers, body}` (plus `response` / `error` when
//! present).

use crate::utils::serde_helpers;
use hyper::Method;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Ordered query or form pairs; repeated keys stay repeated
pub type QueryPairs = Vec<(String, String)>;

/// Header map keyed by lower-cased name
pub type Headers = BTreeMap<String, String>;

/// One observed HTTP call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedExchange {
    #[serde(with = "serde_helpers::method")]
    pub method: Method,

    /// URI path, `/` when the request had none
    pub path: String,

    pub query: QueryPairs,

    pub headers: Headers,

    pub body: NormalizedBody,

    /// Response leg; absent when the transport failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<CapturedResponse>,

    /// Transport failure message when the response leg is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CapturedExchange {
    /// First query value for `key`
    pub fn query_param(&self, key: &str) -> Option<&str> {
        first_value(&self.query, key)
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Response status code, if a response was captured
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

/// Response leg of an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: NormalizedBody,
}

/// A body after content-type driven decoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum NormalizedBody {
    Empty,

    /// Form fields in submission order
    Form(QueryPairs),

    Json(serde_json::Value),

    /// Undecodable or unrecognized content, lossily converted to UTF-8
    Raw(String),
}

impl NormalizedBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, NormalizedBody::Empty)
    }

    /// Variant name as used in fixture documents
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizedBody::Empty => "empty",
            NormalizedBody::Form(_) => "form",
            NormalizedBody::Json(_) => "json",
            NormalizedBody::Raw(_) => "raw",
        }
    }

    /// First form value for `key`; `None` for non-form bodies
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            NormalizedBody::Form(pairs) => first_value(pairs, key),
            _ => None,
        }
    }

    /// Form fields as a map, last value winning on repeated keys
    pub fn to_map(&self) -> Option<HashMap<String, String>> {
        match self {
            NormalizedBody::Form(pairs) => Some(pairs.iter().cloned().collect()),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            NormalizedBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            NormalizedBody::Raw(s) => Some(s),
            _ => None,
        }
    }
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
