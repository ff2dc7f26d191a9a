//! Transport layer: executes one HTTP request and classifies low-level
//! failures into the typed error taxonomy.
//!
//! The trait is the dependency-injection seam: production code uses
//! `HttpTransport` over `reqwest`; tests substitute scripted stubs without
//! any process-wide state. HTTP error statuses are not transport failures;
//! the raw response is always forwarded to the decoder.

use crate::config::host_of;
use crate::error::{Result, SppError};
use async_trait::async_trait;

/// HTTP method subset used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// One fully-built request: method, absolute URL, headers, optional body
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Raw transport-level response: status and body regardless of HTTP status
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Executes a single request. Stateless and reusable across sequential calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Production transport over `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SppError::Transport { detail: format!("failed to build HTTP client: {}", e) })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify(&request.url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| classify(&request.url, e))?.to_vec();

        Ok(RawResponse { status, headers, body })
    }
}

/// Map a `reqwest` failure onto the transport error taxonomy
fn classify(url: &str, err: reqwest::Error) -> SppError {
    if err.is_timeout() {
        return SppError::Timeout;
    }

    let chain = error_chain(&err);

    if err.is_connect() {
        if chain.iter().any(|c| c.contains("Connection refused") || c.contains("refused")) {
            return SppError::ConnectionRefused { url: url.to_string() };
        }
        if chain.iter().any(|c| {
            let lower = c.to_lowercase();
            lower.contains("dns") || lower.contains("failed to lookup")
        }) {
            return SppError::HostUnresolved { host: host_of(url).to_string() };
        }
    }

    SppError::Transport { detail: chain.join(": ") }
}

/// Full source chain as display strings, outermost first
fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        chain.push(s.to_string());
        source = s.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_strings() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_error_chain_collects_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let chain = error_chain(&inner);
        assert_eq!(chain.len(), 1);
        assert!(chain[0].contains("refused"));
    }
}
