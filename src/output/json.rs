//! JSON output of crawled pages

use crate::crawler::PageVisitor;
use crate::output::OutputResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One visited page as written to the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub content: String,
    pub crawled_at: DateTime<Utc>,
}

/// Visitor that keeps every page it is given, in visit order
#[derive(Debug, Default)]
pub struct JsonCollector {
    records: Vec<PageRecord>,
    max_pages: Option<usize>,
}

impl JsonCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collector whose progress log shows `count/max_pages`
    pub fn with_page_budget(max_pages: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            max_pages,
        }
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PageRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl PageVisitor for JsonCollector {
    async fn visit_page(&mut self, url: &str, content: &str) -> anyhow::Result<()> {
        self.records.push(PageRecord {
            url: url.to_string(),
            content: content.to_string(),
            crawled_at: Utc::now(),
        });

        match self.max_pages {
            Some(max) => tracing::info!("{}/{}: Crawled: {}", self.records.len(), max, url),
            None => tracing::info!("{}: Crawled: {}", self.records.len(), url),
        }

        Ok(())
    }
}

/// Writes the records as a JSON array to `path`
///
/// Missing parent directories are created.
pub fn write_json(records: &[PageRecord], path: &Path, pretty: bool) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };

    std::fs::write(path, json)?;
    tracing::debug!("Wrote {} pages to {}", records.len(), path.display());
    Ok(())
}
