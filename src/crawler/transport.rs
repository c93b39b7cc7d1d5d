//! HTTP transport
//!
//! The crawler only needs a single capability from the network layer: issue a
//! GET and hand back the status code and body text. Everything else (TLS,
//! pooling, redirects) belongs to the transport implementation.

use crate::config::CrawlConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// A raw HTTP response as seen by the fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures. All of them are transient for the retry policy.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// Minimal HTTP capability consumed by the crawler
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a GET request for `url`
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// Builds the shared HTTP client for a crawl
///
/// The request timeout and the optional cookie header are fixed here; the
/// client is never reconfigured while a crawl runs.
///
/// # Example
///
/// ```
/// use site_crawler::config::CrawlConfig;
/// use site_crawler::crawler::build_http_client;
///
/// let config = CrawlConfig::new("https://example.com");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = &config.cookie {
        // Validated config never carries control characters
        if let Ok(value) = HeaderValue::from_str(&cookie.header_value()) {
            headers.insert(COOKIE, value);
        } else {
            tracing::warn!("Ignoring cookie '{}': not a valid header value", cookie.name);
        }
    }

    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(config.http_request_timeout())
        .default_headers(headers)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`HttpTransport`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport configured from the crawl configuration
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
