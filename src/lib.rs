//! Site-Crawler: a single-host breadth-first web crawler
//!
//! This crate walks every page reachable from a seed URL on the same host,
//! handing each page's content (optionally narrowed by a CSS selector) to a
//! caller-supplied visitor and following the same-host links it contains.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The visitor failed for a page. Always fatal for the crawl.
    #[error("Page visitor failed for {url}: {source}")]
    Callback {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The crawl was stopped through its cancellation token.
    #[error("Crawl cancelled")]
    Cancelled,

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

impl CrawlError {
    /// Returns true if the crawl stopped because it was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig, RetryConfig};
pub use crawler::{Coordinator, CrawlStats, PageVisitor};
pub use crate::url::{is_same_host, to_fetchable_url};
