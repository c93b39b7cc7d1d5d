//! HTML parsing for content selection and link extraction
//!
//! This module handles the two things the crawler needs from a page:
//! - the content handed to the visitor, optionally narrowed by a CSS selector
//! - the same-host links to follow
//!
//! Both operations are best-effort: malformed markup is parsed as far as the
//! parser can go, and failures produce empty results instead of errors.

use crate::url::is_same_host;
use indexmap::IndexSet;
use scraper::{Html, Selector};
use url::Url;

/// HTML capability consumed by the crawler
pub trait HtmlParser: Send + Sync {
    /// Returns the inner markup of the first element matching `selector`
    ///
    /// A missing or blank selector returns `html` unchanged. No match or an
    /// unparseable selector returns an empty string.
    fn select_content(&self, html: &str, selector: Option<&str>) -> String;

    /// Returns the same-host, fragment-free absolute URLs linked from `html`
    ///
    /// Links are returned once each, in document order.
    fn extract_links(&self, base_url: &Url, html: &str) -> IndexSet<String>;
}

/// [`HtmlParser`] backed by the `scraper` crate (html5ever + CSS selectors)
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser;

impl HtmlParser for ScraperParser {
    fn select_content(&self, html: &str, selector: Option<&str>) -> String {
        select_content(html, selector)
    }

    fn extract_links(&self, base_url: &Url, html: &str) -> IndexSet<String> {
        extract_links(base_url, html)
    }
}

/// Narrows `html` to the inner markup of the first element matching `selector`
///
/// # Example
///
/// ```
/// use site_crawler::crawler::select_content;
///
/// let html = "<html><body><div>X</div></body></html>";
/// assert_eq!(select_content(html, Some("body")), "<div>X</div>");
/// assert_eq!(select_content(html, None), html);
/// assert_eq!(select_content(html, Some("nonexistent")), "");
/// ```
pub fn select_content(html: &str, selector: Option<&str>) -> String {
    let selector = match selector.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => return html.to_string(),
    };

    let parsed = match Selector::parse(selector) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Invalid page selector '{}': {:?}", selector, e);
            return String::new();
        }
    };

    let document = Html::parse_document(html);
    document
        .select(&parsed)
        .next()
        .map(|element| element.inner_html())
        .unwrap_or_default()
}

/// Extracts the links on a page that stay on the host of `base_url`
///
/// # Link Rules
///
/// **Include:**
/// - `<a href="...">` resolving to an absolute URL on the same host
///
/// **Exclude:**
/// - Empty or missing `href`
/// - Hrefs that fail to resolve against `base_url`
/// - Links to other hosts, and schemes without a host (`mailto:`, `javascript:`)
/// - Same-host links with a scheme other than http(s) (`ftp:`, `ws:`)
/// - Any link carrying a non-empty fragment (`#top`, `/page#section`)
///
/// An empty fragment (`/page#`) is dropped and the link kept.
///
/// # Example
///
/// ```
/// use site_crawler::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// let links = extract_links(&base, r#"<a href="/page1">1</a><a href="https://other.com/">2</a>"#);
/// assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://example.com/page1"]);
/// ```
pub fn extract_links(base_url: &Url, html: &str) -> IndexSet<String> {
    let mut links = IndexSet::new();

    let anchor_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::error!("Failed to build anchor selector: {:?}", e);
            return links;
        }
    };

    let document = Html::parse_document(html);

    for element in document.select(&anchor_selector) {
        let href = match element.value().attr("href").map(str::trim) {
            Some(href) if !href.is_empty() => href,
            _ => continue,
        };

        let mut resolved = match base_url.join(href) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::debug!("Skipping invalid href '{}' on {}: {}", href, base_url, e);
                continue;
            }
        };

        match resolved.fragment() {
            Some(fragment) if !fragment.is_empty() => continue,
            Some(_) => resolved.set_fragment(None),
            None => {}
        }

        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }

        if !is_same_host(base_url, &resolved) {
            continue;
        }

        links.insert(resolved.to_string());
    }

    links
}
