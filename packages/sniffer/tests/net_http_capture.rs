// packages/sniffer/tests/net_http_capture.rs
//! End-to-end capture through the real HTTP transport

mod common;

use bytes::Bytes;
use common::{pairs, TestServer};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};
use sentra_lab_sniffer::interception::{HttpTransport, Transport};
use sentra_lab_sniffer::utils::config::TransportConfig;
use sentra_lab_sniffer::{client, send, CapturedExchange, ExchangeRecorder, NormalizedBody, Scope};
use serde_json::json;
use std::sync::Arc;

fn transport() -> Arc<dyn Transport> {
    Arc::new(HttpTransport::new(TransportConfig::default()).unwrap())
}

fn sniff<F, R>(block: F) -> (R, Vec<CapturedExchange>)
where
    F: FnOnce() -> R,
{
    let recorder = ExchangeRecorder::new();
    let result = Scope::new(recorder.clone()).forward_to(transport()).run(block);
    (result, recorder.take())
}

#[test]
fn calls_handler_on_get_request() {
    let server = TestServer::start();

    let (response, captured) = sniff(|| client::get(&server.url("/?lang=ruby&author=matz")));
    let response = response.unwrap();
    assert_eq!(response.body().as_ref(), b"ok");

    assert_eq!(captured.len(), 1);
    let exchange = &captured[0];
    assert_eq!(exchange.method, Method::GET);
    assert_eq!(exchange.path, "/");
    assert_eq!(exchange.query, pairs(&[("lang", "ruby"), ("author", "matz")]));
    assert_eq!(exchange.body, NormalizedBody::Empty);

    let leg = exchange.response.as_ref().unwrap();
    assert_eq!(leg.status, 200);
    assert_eq!(leg.body, NormalizedBody::Raw("ok".to_string()));
}

#[test]
fn dynamic_params_capture_like_static_ones() {
    let server = TestServer::start();

    let (_, literal) = sniff(|| client::get(&server.url("/?lang=ruby&author=matz")));
    let (_, dynamic) = sniff(|| {
        let uri = client::with_query(&server.url("/"), &[("lang", "ruby"), ("author", "matz")])?;
        client::get(&uri.to_string())
    });

    assert_eq!(literal, dynamic);
}

#[test]
fn calls_handler_on_form_post() {
    let server = TestServer::start();

    let (response, captured) =
        sniff(|| client::post_form(&server.url("/data?lang=ruby"), &[("author", "Matz")]));
    response.unwrap();

    let exchange = &captured[0];
    assert_eq!(exchange.method, Method::POST);
    assert_eq!(exchange.path, "/data");
    assert_eq!(exchange.query, pairs(&[("lang", "ruby")]));
    assert_eq!(exchange.body, NormalizedBody::Form(pairs(&[("author", "Matz")])));
    assert_eq!(
        exchange.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
}

#[test]
fn calls_handler_on_text_json_post() {
    let server = TestServer::start();

    let (response, captured) = sniff(|| {
        let body = serde_json::to_vec(&json!({"lang": "Ruby", "author": "Matz"})).unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri(server.url("/json"))
            .header(CONTENT_TYPE, "text/json")
            .body(Bytes::from(body))
            .unwrap();
        send(request)
    });
    response.unwrap();

    let exchange = &captured[0];
    assert_eq!(exchange.path, "/json");
    assert!(exchange.query.is_empty());
    assert_eq!(
        exchange.body,
        NormalizedBody::Json(json!({"lang": "Ruby", "author": "Matz"}))
    );
}

#[test]
fn json_helper_posts_application_json() {
    let server = TestServer::start();

    let (_, captured) = sniff(|| client::post_json(&server.url("/json"), &json!({"n": 1})));

    assert_eq!(captured[0].header("content-type"), Some("application/json"));
    assert_eq!(captured[0].body.as_json(), Some(&json!({"n": 1})));
}

#[test]
fn exchanges_dispatched_in_call_order() {
    let server = TestServer::start();

    let (_, captured) = sniff(|| {
        for path in ["/one", "/two", "/three"] {
            client::get(&server.url(path)).unwrap();
        }
    });

    let paths: Vec<_> = captured.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/one", "/two", "/three"]);
}

#[test]
fn transport_failure_reaches_caller_and_handler() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let (response, captured) = sniff(|| client::get(&format!("http://{}/gone", addr)));

    assert!(response.unwrap_err().is_transport());
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path, "/gone");
    assert!(captured[0].response.is_none());
    assert!(captured[0].error.is_some());
}
