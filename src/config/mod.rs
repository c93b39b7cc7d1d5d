//! Configuration module for Site-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will start at: {}", config.crawler.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CookieConfig, CrawlConfig, OutputConfig, RetryConfig, DEFAULT_HTTP_REQUEST_TIMEOUT_MS,
    DEFAULT_MAX_PAGES_TO_CRAWL, DEFAULT_ON_VISIT_PAGE_TIMEOUT_MS,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_crawl_config};
