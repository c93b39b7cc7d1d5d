use crate::config::types::{Config, CookieConfig, CrawlConfig, OutputConfig, RetryConfig};
use crate::url::parse_http_url;
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawl_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl configuration
///
/// Also used by [`Coordinator`](crate::crawler::Coordinator) so that a
/// malformed seed fails before any request is made.
pub fn validate_crawl_config(config: &CrawlConfig) -> ConfigResult<()> {
    parse_http_url(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.url, e)))?;

    if config.max_pages_to_crawl == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages_to_crawl must be >= 1".to_string(),
        ));
    }

    if config.http_request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "http_request_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.on_visit_page_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "on_visit_page_timeout_ms must be > 0".to_string(),
        ));
    }

    if let Some(cookie) = &config.cookie {
        validate_cookie(cookie)?;
    }

    Ok(())
}

/// Validates the cookie injected into request headers
fn validate_cookie(cookie: &CookieConfig) -> ConfigResult<()> {
    if cookie.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cookie name cannot be empty".to_string(),
        ));
    }

    // Both parts end up in a single header value
    if cookie
        .name
        .chars()
        .chain(cookie.value.chars())
        .any(|c| c.is_control() || c == ';')
    {
        return Err(ConfigError::Validation(format!(
            "cookie '{}' contains control characters or ';'",
            cookie.name
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> ConfigResult<()> {
    if config.max_delay_ms < config.median_first_delay_ms {
        return Err(ConfigError::Validation(format!(
            "max_delay_ms ({}) must be >= median_first_delay_ms ({})",
            config.max_delay_ms, config.median_first_delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
