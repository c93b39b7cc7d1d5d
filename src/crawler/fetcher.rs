//! Page fetcher
//!
//! This module turns a frontier URL into page text:
//! - canonicalizing the URL to its fetchable form
//! - issuing the GET through the [`HttpTransport`] under the retry policy
//! - classifying the final outcome
//!
//! Failures never propagate to the crawl loop; they degrade to empty content.

use crate::crawler::policy::RetryPolicy;
use crate::crawler::transport::{HttpResponse, HttpTransport, TransportError};
use crate::url::to_fetchable_url;
use crate::CrawlError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// The URL that was actually requested
        fetched_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The final attempt returned a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The final attempt failed at the transport level
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    fn from_attempt(fetched_url: &str, attempt: Result<HttpResponse, TransportError>) -> Self {
        match attempt {
            Ok(response) if response.is_success() => FetchResult::Success {
                fetched_url: fetched_url.to_string(),
                status_code: response.status,
                body: response.body,
            },
            Ok(response) => FetchResult::HttpError {
                status_code: response.status,
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }

    /// The page text, or an empty string for any failure
    pub fn into_content(self) -> String {
        match self {
            FetchResult::Success { body, .. } => body,
            _ => String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }
}

/// Fetches pages through a shared transport
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Fetches a URL and classifies the final outcome
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Success |
    /// | HTTP 404 | Retry (unless disabled in the policy) |
    /// | HTTP 408, 5xx | Retry |
    /// | Timeout, connection or other transport error | Retry |
    /// | Any other status | Immediate `HttpError` |
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResult)` - The outcome of the last attempt
    /// * `Err(CrawlError::Url)` - `url` is malformed; nothing was requested
    /// * `Err(CrawlError::Cancelled)` - The crawl was cancelled mid-fetch
    pub async fn fetch_page(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> crate::Result<FetchResult> {
        let fetchable = to_fetchable_url(url)?;
        let transport = &self.transport;
        let target = &fetchable;

        let attempt = self
            .retry
            .execute(target, cancel, move || transport.get(target))
            .await?;

        Ok(FetchResult::from_attempt(fetchable.as_str(), attempt))
    }

    /// Fetches a URL's text, logging failures and returning empty content
    ///
    /// Only cancellation is returned as an error. A URL that has no fetchable
    /// form counts as a failed fetch.
    pub async fn fetch(&self, url: &str, cancel: &CancellationToken) -> crate::Result<String> {
        let result = match self.fetch_page(url, cancel).await {
            Ok(result) => result,
            Err(CrawlError::Url(e)) => {
                tracing::warn!("Error fetching {}: {}", url, e);
                return Ok(String::new());
            }
            Err(e) => return Err(e),
        };

        match &result {
            FetchResult::Success { .. } => {}
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Error fetching {}: HTTP {}", url, status_code);
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Error fetching {}: {}", url, error);
            }
        }

        Ok(result.into_content())
    }
}
