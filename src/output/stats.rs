//! Crawl statistics
//!
//! Counters collected by the coordinator while it walks the frontier, and a
//! plain-text summary for the command line.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages handed to the visitor
    pub pages_visited: u64,

    /// Pages whose fetch failed or returned no content
    pub pages_empty: u64,

    /// Pages abandoned because they exceeded the per-page timeout
    pub pages_timed_out: u64,

    /// New same-host URLs added to the frontier
    pub links_discovered: u64,

    /// URLs still queued when the crawl stopped
    pub pages_remaining: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Number of URLs taken off the frontier
    pub fn pages_processed(&self) -> u64 {
        self.pages_visited + self.pages_empty + self.pages_timed_out
    }

    /// Average processing rate over the whole crawl
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_processed() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Processed: {}", stats.pages_processed());
    println!("  Visited: {}", stats.pages_visited);
    println!("  Empty or failed: {}", stats.pages_empty);
    println!("  Timed out: {}", stats.pages_timed_out);
    println!("  Still queued: {}", stats.pages_remaining);
    println!();

    println!("Links discovered: {}", stats.links_discovered);
    println!(
        "Elapsed: {:.2}s ({:.2} pages/sec)",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    );
}
