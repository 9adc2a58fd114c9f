// packages/sniffer/src/utils/serde_helpers.rs
//! Serde adapters for `http` types that do not implement serde themselves.

use hyper::Method;
use serde::{Deserialize, Deserializer, Serializer};

pub mod method {
    use super::*;

    pub fn serialize<S>(method: &Method, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Method, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Method::from_bytes(s.to_ascii_uppercase().as_bytes()).map_err(serde::de::Error::custom)
    }
}
