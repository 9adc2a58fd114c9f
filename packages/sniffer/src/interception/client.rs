// packages/sniffer/src/interception/client.rs
//! Minimal request helpers
//!
//! Convenience wrappers for the common request shapes. Everything goes
//! through [`transport::send`], so the helpers are intercepted exactly like
//! hand-built requests.

use crate::interception::transport::{self, RawRequest, RawResponse};
use crate::utils::errors::{Result, SnifferError};
use bytes::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::http::uri::PathAndQuery;
use hyper::{Method, Request, Uri};
use serde::Serialize;
use url::form_urlencoded;

/// `GET uri`
pub fn get(uri: &str) -> Result<RawResponse> {
    transport::send(build(Method::GET, uri, None, Bytes::new())?)
}

/// `POST uri` with an `application/x-www-form-urlencoded` body
pub fn post_form<K, V>(uri: &str, fields: &[(K, V)]) -> Result<RawResponse>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let body = encode_pairs(fields);
    transport::send(build(
        Method::POST,
        uri,
        Some(mime::APPLICATION_WWW_FORM_URLENCODED.as_ref()),
        Bytes::from(body),
    )?)
}

/// `POST uri` with an `application/json` body
pub fn post_json<T: Serialize + ?Sized>(uri: &str, value: &T) -> Result<RawResponse> {
    let body = serde_json::to_vec(value)
        .map_err(|e| SnifferError::InvalidRequest(format!("JSON encoding error: {}", e)))?;
    transport::send(build(
        Method::POST,
        uri,
        Some(mime::APPLICATION_JSON.as_ref()),
        Bytes::from(body),
    )?)
}

/// `base` with its query string replaced by the encoded `pairs`
pub fn with_query<K, V>(base: &str, pairs: &[(K, V)]) -> Result<Uri>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let uri: Uri = base
        .parse()
        .map_err(|e| SnifferError::InvalidRequest(format!("Invalid URI {}: {}", base, e)))?;

    let mut parts = uri.into_parts();
    let path = parts
        .path_and_query
        .as_ref()
        .map(|pq| pq.path())
        .unwrap_or("/");
    let query = encode_pairs(pairs);

    let path_and_query = if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    };
    parts.path_and_query = Some(
        path_and_query
            .parse::<PathAndQuery>()
            .map_err(|e| SnifferError::InvalidRequest(format!("Invalid query: {}", e)))?,
    );

    Uri::from_parts(parts).map_err(|e| SnifferError::InvalidRequest(e.to_string()))
}

fn build(method: Method, uri: &str, content_type: Option<&str>, body: Bytes) -> Result<RawRequest> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(CONTENT_TYPE, ct);
    }
    Ok(builder.body(body)?)
}

fn encode_pairs<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish()
}
