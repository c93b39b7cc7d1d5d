use serde::Deserialize;
use std::time::Duration;

/// Default page budget for a crawl
pub const DEFAULT_MAX_PAGES_TO_CRAWL: usize = 1000;

/// Default HTTP request timeout (milliseconds)
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_MS: u64 = 1000;

/// Default per-page processing timeout (milliseconds)
pub const DEFAULT_ON_VISIT_PAGE_TIMEOUT_MS: u64 = 1000;

/// Main configuration structure for Site-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Wraps crawl settings with default retry and output settings
    pub fn new(crawler: CrawlConfig) -> Self {
        Self {
            crawler,
            retry: RetryConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl behavior configuration
///
/// Built once before a crawl and never mutated while it runs.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL; must be an absolute http(s) URL
    pub url: String,

    /// Maximum number of pages to visit (`None` = unbounded)
    #[serde(
        rename = "max-pages-to-crawl",
        default = "default_max_pages_to_crawl"
    )]
    pub max_pages_to_crawl: Option<usize>,

    /// Timeout of a single HTTP request (milliseconds)
    #[serde(
        rename = "http-request-timeout-ms",
        default = "default_http_request_timeout_ms"
    )]
    pub http_request_timeout_ms: u64,

    /// Timeout of the whole per-page unit of work (milliseconds)
    #[serde(
        rename = "on-visit-page-timeout-ms",
        default = "default_on_visit_page_timeout_ms"
    )]
    pub on_visit_page_timeout_ms: u64,

    /// Cookie sent with every request
    #[serde(default)]
    pub cookie: Option<CookieConfig>,

    /// CSS selector narrowing the content handed to the visitor
    #[serde(rename = "page-selector", default)]
    pub page_selector: Option<String>,
}

impl CrawlConfig {
    /// Creates a crawl configuration for `url` with every other option defaulted
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pages_to_crawl: default_max_pages_to_crawl(),
            http_request_timeout_ms: DEFAULT_HTTP_REQUEST_TIMEOUT_MS,
            on_visit_page_timeout_ms: DEFAULT_ON_VISIT_PAGE_TIMEOUT_MS,
            cookie: None,
            page_selector: None,
        }
    }

    pub fn http_request_timeout(&self) -> Duration {
        Duration::from_millis(self.http_request_timeout_ms)
    }

    pub fn on_visit_page_timeout(&self) -> Duration {
        Duration::from_millis(self.on_visit_page_timeout_ms)
    }

    /// The selector to apply, if any. Blank selectors count as absent.
    pub fn selector(&self) -> Option<&str> {
        self.page_selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Cookie injected as a `Cookie: name=value;` request header
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub name: String,
    pub value: String,
}

impl CookieConfig {
    /// Formats the cookie as a `Cookie` header value
    pub fn header_value(&self) -> String {
        format!("{}={};", self.name, self.value)
    }
}

/// Retry policy configuration for the raw HTTP call
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Median delay before the first retry (milliseconds)
    #[serde(
        rename = "median-first-delay-ms",
        default = "default_median_first_delay_ms"
    )]
    pub median_first_delay_ms: u64,

    /// Upper bound for any single retry delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Treat HTTP 404 as a transient failure
    #[serde(rename = "retry-on-not-found", default = "default_true")]
    pub retry_on_not_found: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            median_first_delay_ms: default_median_first_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            retry_on_not_found: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON file the crawled pages are written to
    #[serde(default = "default_output_path")]
    pub path: String,

    /// Pretty-print the JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: true,
        }
    }
}

fn default_max_pages_to_crawl() -> Option<usize> {
    Some(DEFAULT_MAX_PAGES_TO_CRAWL)
}

fn default_http_request_timeout_ms() -> u64 {
    DEFAULT_HTTP_REQUEST_TIMEOUT_MS
}

fn default_on_visit_page_timeout_ms() -> u64 {
    DEFAULT_ON_VISIT_PAGE_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    3
}

fn default_median_first_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_output_path() -> String {
    "crawl.json".to_string()
}

fn default_true() -> bool {
    true
}
