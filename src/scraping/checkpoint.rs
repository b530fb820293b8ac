//! Crawl checkpoints for resume support
//!
//! A checkpoint is a JSON snapshot of every record collected so far plus the
//! set of URLs already attempted. Each save replaces the previous file.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::extractor::FaqRecord;

/// Errors while writing or reading a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable snapshot of crawl state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Records in the order they were collected
    #[serde(default)]
    pub results: Vec<FaqRecord>,
    /// URLs already attempted
    #[serde(default)]
    pub processed_urls: Vec<String>,
}

impl Checkpoint {
    pub fn new(results: Vec<FaqRecord>, processed_urls: &HashSet<String>) -> Self {
        let mut processed_urls: Vec<String> = processed_urls.iter().cloned().collect();
        processed_urls.sort();
        Self {
            results,
            processed_urls,
        }
    }

    /// Processed URLs as a set
    pub fn processed_set(&self) -> HashSet<String> {
        self.processed_urls.iter().cloned().collect()
    }
}

/// Reads and writes the checkpoint file at a fixed path
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the checkpoint with a snapshot of `records` and `processed_urls`.
    ///
    /// Writes a sibling temp file and renames it over the target so an
    /// interrupted save leaves the previous checkpoint intact.
    pub fn save(&self, records: &[FaqRecord], processed_urls: &HashSet<String>) -> Result<(), CheckpointError> {
        let checkpoint = Checkpoint::new(records.to_vec(), processed_urls);
        let json = serde_json::to_string_pretty(&checkpoint)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::info!("Saved checkpoint with {} results", checkpoint.results.len());
        Ok(())
    }

    /// Load the checkpoint; missing or unreadable files yield `None`
    pub fn load(&self) -> Option<Checkpoint> {
        if !self.path.exists() {
            tracing::debug!("No checkpoint at {}", self.path.display());
            return None;
        }

        match self.read() {
            Ok(checkpoint) => {
                tracing::info!(
                    "Loaded checkpoint with {} results and {} processed URLs",
                    checkpoint.results.len(),
                    checkpoint.processed_urls.len()
                );
                Some(checkpoint)
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable checkpoint {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn read(&self) -> Result<Checkpoint, CheckpointError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
