//! Output module for crawl results
//!
//! This module handles:
//! - Collecting visited pages as serializable records
//! - Writing the collected pages to a JSON file after the crawl
//! - Recording and printing crawl statistics

mod json;
pub mod stats;

pub use json::{write_json, JsonCollector, PageRecord};
pub use stats::{print_statistics, CrawlStats};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
