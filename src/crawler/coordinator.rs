//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop, which:
//! - Owns the frontier for the duration of one crawl
//! - Runs each page through fetch, select, visitor, and link extraction
//!   under the per-page timeout
//! - Enforces the page budget and observes cancellation between pages

use crate::config::{validate_crawl_config, CrawlConfig};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlParser, ScraperParser};
use crate::crawler::policy::{run_with_timeout, PageOutcome, RetryPolicy};
use crate::crawler::transport::{HttpTransport, ReqwestTransport};
use crate::crawler::visitor::PageVisitor;
use crate::output::CrawlStats;
use crate::CrawlError;
use indexmap::IndexSet;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What one page contributed to the crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// The fetched text (empty if the fetch failed)
    pub content: String,

    /// Same-host links found on the page
    pub links: IndexSet<String>,
}

impl PageResult {
    fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the page was delivered to the visitor
    pub fn was_visited(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Main crawler coordinator structure
///
/// A coordinator can run any number of crawls; each call to
/// [`crawl`](Self::crawl) gets its own frontier.
pub struct Coordinator {
    config: Arc<CrawlConfig>,
    fetcher: PageFetcher,
    parser: Arc<dyn HtmlParser>,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP with the default retry policy
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(CrawlError)` - The configuration is invalid or the HTTP client
    ///   could not be built
    pub fn new(config: CrawlConfig) -> crate::Result<Self> {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    /// Creates a coordinator that fetches over HTTP with a custom retry policy
    pub fn with_retry_policy(config: CrawlConfig, retry: RetryPolicy) -> crate::Result<Self> {
        validate_crawl_config(&config)?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_components(config, Arc::new(transport), retry, Arc::new(ScraperParser))
    }

    /// Creates a coordinator from explicit transport and parser implementations
    pub fn with_components(
        config: CrawlConfig,
        transport: Arc<dyn HttpTransport>,
        retry: RetryPolicy,
        parser: Arc<dyn HtmlParser>,
    ) -> crate::Result<Self> {
        validate_crawl_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher: PageFetcher::new(transport, retry),
            parser,
        })
    }

    /// Runs a breadth-first crawl from the seed URL
    ///
    /// The loop runs while the queue is non-empty and the number of URLs seen
    /// is within the page budget. For each dequeued URL:
    /// 1. Fetch it (with retries), select content, and call the visitor
    /// 2. Extract same-host links
    /// 3. Enqueue the links not seen before, in discovery order
    ///
    /// A page that exceeds the per-page timeout contributes no links and the
    /// crawl moves on.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - The frontier was exhausted or the budget reached
    /// * `Err(CrawlError::Callback)` - The visitor failed; nothing after that
    ///   page was processed
    /// * `Err(CrawlError::Cancelled)` - The token was cancelled
    pub async fn crawl<V>(
        &self,
        visitor: &mut V,
        cancel: &CancellationToken,
    ) -> crate::Result<CrawlStats>
    where
        V: PageVisitor + ?Sized,
    {
        let max_pages = self.config.max_pages_to_crawl;
        let page_timeout = self.config.on_visit_page_timeout();
        let mut frontier = Frontier::new(&self.config.url);
        let mut stats = CrawlStats::default();
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of {} (page budget: {})",
            self.config.url,
            max_pages.map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        loop {
            if cancel.is_cancelled() {
                tracing::info!(
                    "Crawl cancelled after {} pages",
                    stats.pages_processed()
                );
                return Err(CrawlError::Cancelled);
            }

            if !frontier.within_budget(max_pages) {
                tracing::info!(
                    "Page budget reached ({} URLs seen), stopping crawl",
                    frontier.visited_count()
                );
                break;
            }

            let url = match frontier.pop() {
                Some(url) => url,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
            };

            tracing::debug!("Processing URL: {}", url);

            let work = self.visit_page(&url, &mut *visitor, cancel);
            let outcome = run_with_timeout(page_timeout, cancel, work).await?;

            match outcome {
                PageOutcome::Completed(page) => {
                    if page.was_visited() {
                        stats.pages_visited += 1;
                    } else {
                        stats.pages_empty += 1;
                    }

                    for link in page.links {
                        if frontier.push(link) {
                            stats.links_discovered += 1;
                        }
                    }
                }
                PageOutcome::TimedOut => {
                    tracing::warn!("Timed out after {:?} processing {}", page_timeout, url);
                    stats.pages_timed_out += 1;
                }
            }

            let processed = stats.pages_processed();
            if processed % 10 == 0 {
                stats.elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} pages processed, {} in frontier, {:.2} pages/sec",
                    processed,
                    frontier.pending(),
                    stats.pages_per_second()
                );
            }
        }

        stats.pages_remaining = frontier.pending() as u64;
        stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} pages visited in {:?}",
            stats.pages_visited,
            stats.elapsed
        );

        Ok(stats)
    }

    /// Processes a single URL: fetch, select, visit, extract links
    ///
    /// Empty or failed fetches skip the visitor and yield no links. A visitor
    /// failure is returned as [`CrawlError::Callback`].
    pub async fn visit_page<V>(
        &self,
        url: &str,
        visitor: &mut V,
        cancel: &CancellationToken,
    ) -> crate::Result<PageResult>
    where
        V: PageVisitor + ?Sized,
    {
        let content = self.fetcher.fetch(url, cancel).await?;
        if content.trim().is_empty() {
            return Ok(PageResult::empty());
        }

        let selected = self.parser.select_content(&content, self.config.selector());

        if let Err(source) = visitor.visit_page(url, &selected).await {
            tracing::error!("Page visitor failed for {}: {}", url, source);
            return Err(CrawlError::Callback {
                url: url.to_string(),
                source,
            });
        }

        let links = match Url::parse(url) {
            Ok(base_url) => self.parser.extract_links(&base_url, &content),
            Err(e) => {
                tracing::error!("Cannot extract links from {}: {}", url, e);
                IndexSet::new()
            }
        };

        Ok(PageResult { content, links })
    }
}
