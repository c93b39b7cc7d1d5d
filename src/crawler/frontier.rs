//! Breadth-first traversal state
//!
//! The frontier pairs a FIFO queue of URLs waiting to be visited with the set
//! of every URL ever enqueued. A URL is added to the visited set at the moment
//! it is enqueued, so each URL is queued at most once and the queue is always
//! a subset of the visited set.

use crate::url::to_fetchable_url;
use std::collections::{HashSet, VecDeque};

/// Visited set + pending queue for one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    queue: VecDeque<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn new(seed: &str) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed.to_string());
        frontier
    }

    /// Enqueues `url` unless it was seen before; returns true if it was added
    pub fn push(&mut self, url: String) -> bool {
        if !self.visited.insert(visit_key(&url)) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Dequeues the oldest pending URL
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&visit_key(url))
    }

    /// Number of URLs ever enqueued, including the ones already processed
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs still waiting to be processed
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns true while the visited count has not gone past the budget
    ///
    /// The budget is inclusive: a crawl with a budget of N keeps going while
    /// N or fewer URLs have been seen.
    pub fn within_budget(&self, max_pages: Option<usize>) -> bool {
        max_pages.map_or(true, |max| self.visited.len() <= max)
    }
}

/// Identity used for the visited set
///
/// URLs are compared in fetchable form so `/docs` and `/docs/` are one page.
fn visit_key(url: &str) -> String {
    to_fetchable_url(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}
