// packages/sniffer/src/interception/http_transport.rs
//! Real network transport
//!
//! Blocking facade over the hyper legacy client. Each instance owns a
//! current-thread tokio runtime. Calls made from inside another runtime are
//! driven on a short-lived helper thread, since a runtime cannot be blocked
//! on from within one. The calling task is still blocked until the
//! response arrives.

use crate::interception::transport::{RawRequest, RawResponse, Transport};
use crate::utils::config::TransportConfig;
use crate::utils::errors::{Result, SnifferError};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::error::Error as StdError;
use tokio::runtime::{Handle, Runtime};
use tracing::debug;

/// Plain-HTTP transport backed by hyper
pub struct HttpTransport {
    config: TransportConfig,
    runtime: Runtime,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: TransportConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SnifferError::TransportFailed(format!("Failed to build runtime: {}", e)))?;

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(config.pool_idle_timeout())
            .build_http();

        Ok(Self {
            config,
            runtime,
            client,
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn round_trip(&self, request: RawRequest) -> Result<RawResponse> {
        let (parts, body) = request.into_parts();
        let request = Request::from_parts(parts, Full::new(body));

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| SnifferError::TransportFailed(error_chain(&e)))?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| {
                SnifferError::TransportFailed(format!("Response body error: {}", error_chain(&e)))
            })?
            .to_bytes();

        Ok(Response::from_parts(parts, body))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: RawRequest) -> Result<RawResponse> {
        let uri = request.uri();
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(SnifferError::InvalidRequest(format!(
                "Absolute URI required, got {}",
                uri
            )));
        }

        debug!("Sending {} {}", request.method(), uri);

        if Handle::try_current().is_err() {
            return self.drive(request);
        }

        debug!("Inside an async runtime, driving request on a helper thread");
        std::thread::scope(|s| s.spawn(move || self.drive(request)).join())
            .map_err(|_| SnifferError::TransportFailed("Transport worker panicked".to_string()))?
    }
}

impl HttpTransport {
    fn drive(&self, request: RawRequest) -> Result<RawResponse> {
        let timeout = self.config.request_timeout();
        self.runtime.block_on(async {
            match tokio::time::timeout(timeout, self.round_trip(request)).await {
                Ok(result) => result,
                Err(_) => Err(SnifferError::TransportTimeout(timeout)),
            }
        })
    }
}

fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_round_trip() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        );
        let transport = HttpTransport::new(TransportConfig::default()).unwrap();

        let request = Request::builder()
            .uri(format!("{}/ping", base))
            .body(Bytes::new())
            .unwrap();
        let response = transport.send(request).unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body().as_ref(), b"ok");
    }

    #[tokio::test]
    async fn test_send_from_async_context() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nasync",
        );
        let transport = HttpTransport::new(TransportConfig::default()).unwrap();

        let request = Request::builder()
            .uri(format!("{}/inside-runtime", base))
            .body(Bytes::new())
            .unwrap();
        let response = transport.send(request).unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body().as_ref(), b"async");
    }

    #[test]
    fn test_relative_uri_rejected() {
        let transport = HttpTransport::new(TransportConfig::default()).unwrap();
        let request = Request::builder().uri("/ping").body(Bytes::new()).unwrap();

        assert!(matches!(
            transport.send(request),
            Err(SnifferError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_connection_refused_is_transport_failure() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let transport = HttpTransport::new(TransportConfig::default()).unwrap();
        let request = Request::builder()
            .uri(format!("http://{}/", addr))
            .body(Bytes::new())
            .unwrap();

        let err = transport.send(request).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_timeout_surfaces() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_millis(500));
        });

        let config = TransportConfig {
            request_timeout_ms: 50,
            ..TransportConfig::default()
        };
        let transport = HttpTransport::new(config).unwrap();
        let request = Request::builder()
            .uri(format!("http://{}/slow", addr))
            .body(Bytes::new())
            .unwrap();

        assert!(matches!(
            transport.send(request),
            Err(SnifferError::TransportTimeout(_))
        ));
    }
}
