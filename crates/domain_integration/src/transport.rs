//! HTTP transport
//!
//! The transport is the only place that touches the network. Adapters build
//! an [`OutboundRequest`] and hand it to an [`HttpTransport`]; any non-2xx
//! answer comes back as [`TransportError::Status`] with the decoded body, so
//! retry policies and error normalizers can inspect it.
//!
//! [`ReqwestTransport`] keeps one pooled client per TLS mode. Certificate
//! validation is on unless the request explicitly opts out, which only
//! happens for integrations configured with `allow_invalid_certs`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

pub use reqwest::Method;

/// A fully resolved request: absolute URL, auth headers, optional JSON body
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub allow_invalid_certs: bool,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            allow_invalid_certs: false,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn allow_invalid_certs(mut self, allow: bool) -> Self {
        self.allow_invalid_certs = allow;
        self
    }

    /// Returns the first header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful (2xx) upstream answer
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Decoded body; `Value::Null` when the body was empty
    pub body: Value,
}

/// Transport-level failure
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The upstream answered with a non-2xx status
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: Option<Value> },

    /// The request did not complete within the transport timeout
    #[error("request timed out")]
    Timeout,

    /// No connection could be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other failure (request building, body read, redirect loop, ...)
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            TransportError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Sends outbound requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }
}

/// Decodes a response body: JSON when possible, otherwise the raw text
pub fn decode_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

/// Settings for the reqwest-backed transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("clinic-integrations/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Certificate validation mode used for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVerification {
    Verify,
    AcceptInvalid,
}

impl TlsVerification {
    pub fn for_request(request: &OutboundRequest) -> Self {
        if request.allow_invalid_certs {
            TlsVerification::AcceptInvalid
        } else {
            TlsVerification::Verify
        }
    }
}

/// Pooled reqwest transport shared by every call
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    verifying: Client,
    accepting_invalid: Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let build = |accept_invalid: bool| {
            Client::builder()
                .timeout(config.timeout)
                .user_agent(config.user_agent.clone())
                .danger_accept_invalid_certs(accept_invalid)
                .build()
                .map_err(TransportError::from)
        };

        Ok(Self {
            verifying: build(false)?,
            accepting_invalid: build(true)?,
        })
    }

    fn client(&self, mode: TlsVerification) -> &Client {
        match mode {
            TlsVerification::Verify => &self.verifying,
            TlsVerification::AcceptInvalid => &self.accepting_invalid,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let client = self.client(TlsVerification::for_request(&request));

        let mut builder = client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = decode_body(&text);

        if status.is_success() {
            Ok(TransportResponse {
                status: status.as_u16(),
                body: body.unwrap_or(Value::Null),
            })
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), None);
        assert_eq!(decode_body("  \n"), None);
        assert_eq!(decode_body("{\"a\":1}"), Some(json!({"a": 1})));
        assert_eq!(
            decode_body("Não foi possível"),
            Some(Value::String("Não foi possível".to_string()))
        );
    }

    #[test]
    fn test_tls_verification_is_default() {
        let request = OutboundRequest::new(Method::GET, "https://matrix.example.com");
        assert_eq!(TlsVerification::for_request(&request), TlsVerification::Verify);

        let request = request.allow_invalid_certs(true);
        assert_eq!(
            TlsVerification::for_request(&request),
            TlsVerification::AcceptInvalid
        );
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = OutboundRequest::new(Method::GET, "http://x")
            .with_header("Authorization", "Bearer abc");
        assert_eq!(request.header("authorization"), Some("Bearer abc"));
        assert_eq!(request.header("Token"), None);
    }

    #[tokio::test]
    async fn test_reqwest_transport_sends_headers_query_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/horarios"))
            .and(query_param("unidade", "3"))
            .and(header("Authorization", "Bearer abc"))
            .and(body_json(json!({"x": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let request = OutboundRequest::new(Method::POST, format!("{}/horarios", server.uri()))
            .with_header("Authorization", "Bearer abc")
            .with_query(vec![("unidade".to_string(), "3".to_string())])
            .with_json(json!({"x": 1}));

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_reqwest_transport_maps_error_status_with_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fail"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"erro": "inválido"})))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let err = transport
            .send(OutboundRequest::new(Method::GET, format!("{}/fail", server.uri())))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(err.body(), Some(&json!({"erro": "inválido"})));
    }

    #[tokio::test]
    async fn test_reqwest_transport_empty_success_body_is_null() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let response = transport
            .send(OutboundRequest::new(Method::POST, format!("{}/empty", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status, 204);
        assert_eq!(response.body, Value::Null);
    }
}
