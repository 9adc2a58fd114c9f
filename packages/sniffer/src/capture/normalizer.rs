// packages/sniffer/src/capture/normalizer.rs
//! Body, query and header normalization
//!
//! Decoding is best effort. A body that does not parse under its declared
//! content type degrades to `NormalizedBody::Raw`; nothing in here returns
//! an error, so capture can never block real traffic.

use crate::capture::exchange::{CapturedExchange, CapturedResponse, Headers, NormalizedBody, QueryPairs};
use crate::utils::config::CaptureConfig;
use hyper::header::CONTENT_TYPE;
use hyper::{HeaderMap, Request, Response, Uri};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use tracing::debug;

/// Replacement value for redacted headers
pub const REDACTED: &str = "[REDACTED]";

/// Body encodings the normalizer knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Form,
    Json,
    Other,
}

/// Decode `body` according to the content type found in `headers`
pub fn normalize(headers: &HeaderMap, body: &[u8]) -> NormalizedBody {
    if body.is_empty() {
        return NormalizedBody::Empty;
    }

    match body_kind(headers) {
        BodyKind::Form => match std::str::from_utf8(body).ok().and_then(decode_form) {
            Some(pairs) => NormalizedBody::Form(pairs),
            None => {
                debug!("Form body does not decode to UTF-8, keeping raw");
                raw(body)
            }
        },
        BodyKind::Json => match serde_json::from_slice(body) {
            Ok(value) => NormalizedBody::Json(value),
            Err(e) => {
                debug!("JSON body failed to parse, keeping raw: {}", e);
                raw(body)
            }
        },
        BodyKind::Other => raw(body),
    }
}

/// Ordered query pairs of `uri`; empty when there is no query string
///
/// A key or value whose percent-decoding is not UTF-8 is kept in its
/// encoded form.
pub fn parse_query(uri: &Uri) -> QueryPairs {
    let Some(query) = uri.query() else {
        return QueryPairs::new();
    };

    split_pairs(query)
        .map(|(k, v)| (decode_or_keep(k), decode_or_keep(v)))
        .collect()
}

/// Lower-cased, comma-joined, redacted view of a header map
pub fn normalize_headers(headers: &HeaderMap, config: &CaptureConfig) -> Headers {
    let mut out = Headers::new();

    for name in headers.keys() {
        let key = name.as_str().to_string();

        let value = if config.is_redacted(&key) {
            REDACTED.to_string()
        } else {
            headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        };

        out.insert(key, value);
    }

    out
}

/// Capture the request leg of an exchange
pub fn capture_request<B: AsRef<[u8]>>(request: &Request<B>, config: &CaptureConfig) -> CapturedExchange {
    let uri = request.uri();
    let path = match uri.path() {
        "" => "/".to_string(),
        p => p.to_string(),
    };

    CapturedExchange {
        method: request.method().clone(),
        path,
        query: parse_query(uri),
        headers: normalize_headers(request.headers(), config),
        body: normalize(request.headers(), request.body().as_ref()),
        response: None,
        error: None,
    }
}

/// Capture the response leg of an exchange
pub fn capture_response<B: AsRef<[u8]>>(response: &Response<B>, config: &CaptureConfig) -> CapturedResponse {
    CapturedResponse {
        status: response.status().as_u16(),
        headers: normalize_headers(response.headers(), config),
        body: normalize(response.headers(), response.body().as_ref()),
    }
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(mime) = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.to_ascii_lowercase().parse::<mime::Mime>().ok())
    else {
        return BodyKind::Other;
    };

    if mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        BodyKind::Form
    } else if mime.suffix() == Some(mime::JSON)
        || (mime.subtype() == mime::JSON
            && (mime.type_() == mime::APPLICATION || mime.type_() == mime::TEXT))
    {
        BodyKind::Json
    } else {
        BodyKind::Other
    }
}

fn split_pairs(input: &str) -> impl Iterator<Item = (&str, &str)> {
    input
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
}

/// `None` as soon as any key or value is not UTF-8 once decoded
fn decode_form(input: &str) -> Option<QueryPairs> {
    split_pairs(input)
        .map(|(k, v)| Some((decode_component(k)?, decode_component(v)?)))
        .collect()
}

fn decode_component(encoded: &str) -> Option<String> {
    let spaced = encoded.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

fn decode_or_keep(encoded: &str) -> String {
    decode_component(encoded).unwrap_or_else(|| encoded.to_string())
}

fn raw(body: &[u8]) -> NormalizedBody {
    NormalizedBody::Raw(String::from_utf8_lossy(body).into_owned())
}
