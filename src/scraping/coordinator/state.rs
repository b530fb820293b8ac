//! Crawl state shared between workers
//!
//! One mutex covers the processed set, the in-flight set and the record list,
//! so claiming a URL and recording its result are each a single critical
//! section.

use parking_lot::Mutex;
use std::collections::HashSet;

use crate::scraping::checkpoint::Checkpoint;
use crate::scraping::extractor::FaqRecord;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<FaqRecord>,
    processed: HashSet<String>,
    in_flight: HashSet<String>,
}

/// Records and processed URLs accumulated during a crawl
#[derive(Debug, Default)]
pub struct CrawlState {
    inner: Mutex<Inner>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously saved checkpoint
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        let processed = checkpoint.processed_set();
        Self {
            inner: Mutex::new(Inner {
                records: checkpoint.results,
                processed,
                in_flight: HashSet::new(),
            }),
        }
    }

    /// Check whether a URL has already been attempted
    pub fn is_processed(&self, url: &str) -> bool {
        self.inner.lock().processed.contains(url)
    }

    /// Claim a URL for processing.
    ///
    /// Returns false when the URL is already processed or another worker holds it.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.processed.contains(url) || inner.in_flight.contains(url) {
            return false;
        }
        inner.in_flight.insert(url.to_string());
        true
    }

    /// Mark a claimed URL as processed, appending its record if there is one
    pub fn complete(&self, url: &str, record: Option<FaqRecord>) {
        let mut inner = self.inner.lock();
        inner.in_flight.remove(url);
        inner.processed.insert(url.to_string());
        if let Some(record) = record {
            inner.records.push(record);
        }
    }

    /// Copy of the current records and processed set
    pub fn snapshot(&self) -> (Vec<FaqRecord>, HashSet<String>) {
        let inner = self.inner.lock();
        (inner.records.clone(), inner.processed.clone())
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn processed_count(&self) -> usize {
        self.inner.lock().processed.len()
    }
}
