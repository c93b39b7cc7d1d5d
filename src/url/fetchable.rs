use crate::url::parse_http_url;
use crate::UrlResult;
use url::Url;

/// Converts a URL to the form that is actually requested
///
/// A path with no `.` in it (not file-like) that does not already end in `/`
/// gets a trailing `/`, so `/docs` and `/docs/` are fetched the same way.
/// The rule is idempotent. Malformed URLs are rejected.
///
/// # Examples
///
/// ```
/// use site_crawler::url::to_fetchable_url;
///
/// assert_eq!(to_fetchable_url("https://example.com").unwrap().as_str(), "https://example.com/");
/// assert_eq!(to_fetchable_url("https://example.com/docs").unwrap().as_str(), "https://example.com/docs/");
/// assert_eq!(
///     to_fetchable_url("https://example.com/path/file.html").unwrap().as_str(),
///     "https://example.com/path/file.html"
/// );
/// ```
pub fn to_fetchable_url(url_str: &str) -> UrlResult<Url> {
    let mut url = parse_http_url(url_str)?;

    let path = url.path();
    if !path.contains('.') && !path.ends_with('/') {
        let with_slash = format!("{}/", path);
        url.set_path(&with_slash);
    }

    Ok(url)
}
