//! The per-page callback contract

use async_trait::async_trait;

/// Receives every successfully fetched, non-empty page exactly once
///
/// The visitor runs before the page's links are extracted. Returning an error
/// stops the whole crawl: it surfaces as [`CrawlError::Callback`] and no
/// further pages are processed.
///
/// Synchronous closures taking `(&str, &str)` implement this trait directly.
///
/// [`CrawlError::Callback`]: crate::CrawlError::Callback
#[async_trait]
pub trait PageVisitor: Send {
    async fn visit_page(&mut self, url: &str, content: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> PageVisitor for F
where
    F: FnMut(&str, &str) -> anyhow::Result<()> + Send,
{
    async fn visit_page(&mut self, url: &str, content: &str) -> anyhow::Result<()> {
        self(url, content)
    }
}
