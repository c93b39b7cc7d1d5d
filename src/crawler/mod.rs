//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML content selection and link extraction
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod policy;
mod transport;
mod visitor;

pub use coordinator::{Coordinator, PageResult};
pub use fetcher::{FetchResult, PageFetcher};
pub use frontier::Frontier;
pub use parser::{extract_links, select_content, HtmlParser, ScraperParser};
pub use policy::{run_with_timeout, AttemptResult, PageOutcome, RetryPolicy};
pub use transport::{build_http_client, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use visitor::PageVisitor;

pub use crate::output::CrawlStats;

use crate::config::Config;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl from a loaded configuration
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the crawl settings
/// 2. Build the HTTP client and retry policy
/// 3. Walk the site breadth-first, handing each page to `visitor`
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::load_config;
/// use site_crawler::crawler::crawl;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawler.toml"))?;
/// let mut visitor = |url: &str, content: &str| -> anyhow::Result<()> {
///     println!("{}: {} bytes", url, content.len());
///     Ok(())
/// };
/// crawl(&config, &mut visitor, &CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl<V>(
    config: &Config,
    visitor: &mut V,
    cancel: &CancellationToken,
) -> crate::Result<CrawlStats>
where
    V: PageVisitor + ?Sized,
{
    let retry = RetryPolicy::from_config(&config.retry);
    let coordinator = Coordinator::with_retry_policy(config.crawler.clone(), retry)?;
    coordinator.crawl(visitor, cancel).await
}
