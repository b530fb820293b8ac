//! Crawl and fetch configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::scraping::fetcher::{FetchConfig, BROWSER_USER_AGENT};

/// Help-center site crawled by default
pub const DEFAULT_BASE_URL: &str = "https://wise.com";

/// "Sending money" topic index on the default site
pub const DEFAULT_INDEX_URL: &str = "https://wise.com/help/topics/5bVKT0uQdBrDp6T62keyfz/sending-money";

/// Crawl configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Base URL question links are resolved against
    pub base_url: String,
    /// Category index page to enumerate
    pub index_url: String,
    /// Concurrent detail-page workers
    pub max_workers: usize,
    /// Attempts per page, including the first
    pub max_retries: u32,
    /// Backoff unit in milliseconds; the wait after attempt `n` is `base * 2^n`
    pub retry_backoff_base_ms: u64,
    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Checkpoint file
    pub checkpoint_path: PathBuf,
    /// Save a checkpoint after every N completed pages
    pub checkpoint_interval: usize,
    /// CSV output file
    pub output_path: PathBuf,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            max_workers: 5,
            max_retries: 3,
            retry_backoff_base_ms: 1000,
            request_timeout_secs: 30,
            user_agent: BROWSER_USER_AGENT.to_string(),
            checkpoint_path: PathBuf::from("scraper_checkpoint.json"),
            checkpoint_interval: 10,
            output_path: PathBuf::from("wise_help_content.csv"),
        }
    }
}

impl ScrapingConfig {
    /// Fetcher settings derived from this section
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.retry_backoff_base_ms),
            ..FetchConfig::default()
        }
    }
}
