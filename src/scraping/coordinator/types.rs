//! Coordinator types: configuration, progress, statistics and errors

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::scraping::{
    extractor::FaqRecord,
    fetcher::{FetchConfig, FetchError},
    sink::SinkError,
};

/// Configuration for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Base URL question links are resolved against
    pub base_url: Url,
    /// Category index page to enumerate
    pub index_url: String,
    /// Concurrent detail-page workers
    pub max_workers: usize,
    /// Save a checkpoint after every N completed dispatches
    pub checkpoint_interval: usize,
    /// Checkpoint file
    pub checkpoint_path: PathBuf,
    /// Restore state from the checkpoint before crawling
    pub resume: bool,
    /// CSV output file
    pub output_path: PathBuf,
    /// Fetch configuration
    pub fetch: FetchConfig,
}

impl CrawlConfig {
    /// Build a crawl configuration from the TOML scraping section
    pub fn from_config(config: &crate::config::ScrapingConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid base_url '{}': {}", config.base_url, e))?;

        Ok(Self {
            base_url,
            index_url: config.index_url.clone(),
            max_workers: config.max_workers,
            checkpoint_interval: config.checkpoint_interval,
            checkpoint_path: config.checkpoint_path.clone(),
            resume: true,
            output_path: config.output_path.clone(),
            fetch: config.fetch_config(),
        })
    }
}

/// Progress after each completed dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlProgress {
    /// Dispatches finished so far (any outcome)
    pub completed: usize,
    /// Dispatches submitted
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Callback invoked on the coordinator task after every completion
pub type ProgressHook = Arc<dyn Fn(&CrawlProgress) + Send + Sync>;

/// Statistics for a crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Records restored from the checkpoint
    pub restored_records: usize,
    /// Categories found on the index page
    pub categories: usize,
    /// Question links found on the index page
    pub candidates: usize,
    /// Links skipped because they were already processed
    pub skipped_already_processed: usize,
    /// Detail pages fetched successfully
    pub fetched: usize,
    /// Dispatches that produced a record
    pub succeeded: usize,
    /// Dispatches that failed to fetch or had no usable answer
    pub failed: usize,
    /// Checkpoints written
    pub checkpoints_saved: usize,
    /// Whether the run was cancelled before finishing
    pub interrupted: bool,
}

/// Result of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// All records, restored ones first, then in completion order
    pub records: Vec<FaqRecord>,
    pub stats: CrawlStats,
    /// Whether the CSV output was written
    pub output_written: bool,
}

/// What happened to one dispatched link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Another worker already handled the URL
    Skipped,
    Succeeded,
    /// Page fetched but no answer could be extracted
    NoContent,
    /// Page could not be fetched
    FetchFailed { reason: String },
}

/// Errors that end a crawl run
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to write output: {0}")]
    Sink(#[from] SinkError),
}
