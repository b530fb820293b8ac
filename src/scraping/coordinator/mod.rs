//! Crawl coordinator for a help-center topic index
//!
//! A run restores the checkpoint, enumerates question links from the category
//! index page, then fetches every unprocessed detail page on a bounded worker
//! pool. State is checkpointed every `checkpoint_interval` completions, once
//! more at the end, and immediately on cancellation.

mod state;
mod types;

pub use state::CrawlState;
pub use types::*;

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::{
    checkpoint::CheckpointStore,
    extractor::{extract_question_links, ContentExtractor, ExtractedFaq, QuestionLink},
    fetcher::{FetchEngine, FetchStats},
    sink::{CsvLayout, ResultSink},
};
use crate::util::truncate_str;

/// Result of the index stage
enum IndexOutcome {
    Links(Vec<QuestionLink>),
    Failed,
    Cancelled,
}

/// Coordinates one crawl of a category index and its question pages
pub struct CrawlCoordinator {
    config: CrawlConfig,
    /// Shared by all workers; stats use atomics
    fetcher: Arc<FetchEngine>,
    /// Arc for spawn_blocking sharing
    extractor: Arc<ContentExtractor>,
    checkpoints: CheckpointStore,
    progress: Option<ProgressHook>,
}

impl CrawlCoordinator {
    /// Create a coordinator with the default extraction cascade
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = FetchEngine::new(config.fetch.clone())?;
        let checkpoints = CheckpointStore::new(config.checkpoint_path.clone());

        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(ContentExtractor::default()),
            checkpoints,
            progress: None,
        })
    }

    /// Call `hook` after every completed dispatch
    pub fn with_progress(mut self, hook: ProgressHook) -> Self {
        self.progress = Some(hook);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// HTTP statistics for the run so far
    pub fn fetch_stats(&self) -> FetchStats {
        self.fetcher.stats()
    }

    /// Run the crawl until every candidate is processed or `cancel` fires.
    ///
    /// The CSV output is written only when the run completes; an interrupted
    /// run leaves its progress in the checkpoint.
    pub async fn run(&self, cancel: CancellationToken) -> Result<CrawlOutcome, CrawlError> {
        let mut stats = CrawlStats::default();

        let restored = if self.config.resume {
            self.checkpoints.load()
        } else {
            tracing::info!("Starting fresh, ignoring any existing checkpoint");
            None
        };
        let state = Arc::new(match restored {
            Some(checkpoint) => {
                stats.restored_records = checkpoint.results.len();
                CrawlState::from_checkpoint(checkpoint)
            }
            None => CrawlState::new(),
        });

        let interrupted = match self.fetch_index(&cancel).await {
            IndexOutcome::Cancelled => true,
            IndexOutcome::Failed => false,
            IndexOutcome::Links(links) => {
                let pending = self.enumerate(&state, links, &mut stats);
                self.dispatch(&state, pending, &cancel, &mut stats).await
            }
        };

        if interrupted {
            stats.interrupted = true;
            tracing::warn!("Crawl interrupted with {} records, saving checkpoint", state.record_count());
            self.save_checkpoint(&state, &mut stats);
            let (records, _) = state.snapshot();
            return Ok(CrawlOutcome {
                records,
                stats,
                output_written: false,
            });
        }

        self.save_checkpoint(&state, &mut stats);
        let (records, _) = state.snapshot();
        ResultSink::new(CsvLayout::Crawl).write(&records, &self.config.output_path)?;

        tracing::info!(
            "Crawl finished: {} succeeded, {} failed, {} skipped, {} records from {} processed URLs",
            stats.succeeded,
            stats.failed,
            stats.skipped_already_processed,
            records.len(),
            state.processed_count()
        );

        Ok(CrawlOutcome {
            records,
            stats,
            output_written: true,
        })
    }

    /// Fetch the category index and enumerate its question links
    async fn fetch_index(&self, cancel: &CancellationToken) -> IndexOutcome {
        tracing::info!("Fetching category index {}", self.config.index_url);

        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => return IndexOutcome::Cancelled,
            page = self.fetcher.fetch(&self.config.index_url) => page,
        };

        let Some(html) = page.body else {
            tracing::error!(
                "Failed to fetch category index {}: {}",
                self.config.index_url,
                page.error.unwrap_or_default()
            );
            return IndexOutcome::Failed;
        };

        let base_url = self.config.base_url.clone();
        match tokio::task::spawn_blocking(move || extract_question_links(&html, &base_url)).await {
            Ok(links) => IndexOutcome::Links(links),
            Err(e) => {
                tracing::error!("Index extraction task failed: {}", e);
                IndexOutcome::Failed
            }
        }
    }

    /// Drop links whose URL is already processed
    fn enumerate(&self, state: &CrawlState, links: Vec<QuestionLink>, stats: &mut CrawlStats) -> Vec<QuestionLink> {
        stats.categories = links
            .iter()
            .map(|link| link.category.as_str())
            .collect::<HashSet<_>>()
            .len();
        stats.candidates = links.len();

        let pending: Vec<QuestionLink> = links
            .into_iter()
            .filter(|link| !state.is_processed(&link.url))
            .collect();
        stats.skipped_already_processed = stats.candidates - pending.len();

        if stats.candidates == 0 {
            tracing::warn!("No question links found on {}", self.config.index_url);
        }
        tracing::info!(
            "Found {} new questions to process ({} already done)",
            pending.len(),
            stats.skipped_already_processed
        );

        pending
    }

    /// Process links on the worker pool. Returns true if cancelled.
    async fn dispatch(
        &self,
        state: &Arc<CrawlState>,
        links: Vec<QuestionLink>,
        cancel: &CancellationToken,
        stats: &mut CrawlStats,
    ) -> bool {
        let max_workers = self.config.max_workers.max(1);
        let checkpoint_interval = self.config.checkpoint_interval.max(1);
        let semaphore = Arc::new(Semaphore::new(max_workers));
        let mut tasks = JoinSet::new();

        tracing::info!("Dispatching {} questions to {} workers", links.len(), max_workers);

        let mut progress = CrawlProgress {
            total: links.len(),
            ..CrawlProgress::default()
        };

        for link in links {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let state = Arc::clone(state);
            tasks.spawn(async move {
                // Held until the task completes
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return DispatchOutcome::Skipped;
                };
                process_link(&fetcher, extractor, &state, link).await
            });
        }

        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!(
                        "Cancelled after {}/{} questions; abandoning in-flight pages",
                        progress.completed,
                        progress.total
                    );
                    tasks.abort_all();
                    return true;
                }
                joined = tasks.join_next() => joined,
            };
            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok(DispatchOutcome::Succeeded) => {
                    stats.fetched += 1;
                    stats.succeeded += 1;
                    progress.succeeded += 1;
                }
                Ok(DispatchOutcome::NoContent) => {
                    stats.fetched += 1;
                    stats.failed += 1;
                    progress.failed += 1;
                }
                Ok(DispatchOutcome::FetchFailed { reason }) => {
                    tracing::debug!("Fetch failed: {}", reason);
                    stats.failed += 1;
                    progress.failed += 1;
                }
                Ok(DispatchOutcome::Skipped) => {
                    stats.skipped_already_processed += 1;
                }
                Err(e) => {
                    tracing::error!("Crawl worker failed: {}", e);
                    stats.failed += 1;
                    progress.failed += 1;
                }
            }

            progress.completed += 1;
            if let Some(hook) = &self.progress {
                hook(&progress);
            }

            if progress.completed % checkpoint_interval == 0 {
                tracing::info!("Processed {}/{} questions", progress.completed, progress.total);
                self.save_checkpoint(state, stats);
            }
        }

        false
    }

    /// Persist the current state; failures are logged, not raised
    fn save_checkpoint(&self, state: &CrawlState, stats: &mut CrawlStats) {
        let (records, processed) = state.snapshot();
        match self.checkpoints.save(&records, &processed) {
            Ok(()) => stats.checkpoints_saved += 1,
            Err(e) => tracing::error!("Failed to save checkpoint {}: {}", self.checkpoints.path().display(), e),
        }
    }
}

/// Fetch one question page and record its answer
async fn process_link(
    fetcher: &FetchEngine,
    extractor: Arc<ContentExtractor>,
    state: &CrawlState,
    link: QuestionLink,
) -> DispatchOutcome {
    if !state.try_claim(&link.url) {
        tracing::debug!("Skipping already processed {}", link.url);
        return DispatchOutcome::Skipped;
    }

    tracing::info!("Processing: {}", truncate_str(&link.label, 80));

    let page = fetcher.fetch(&link.url).await;
    let Some(body) = page.body else {
        tracing::warn!(url = %link.url, "Could not fetch question page");
        state.complete(&link.url, None);
        return DispatchOutcome::FetchFailed {
            reason: page.error.unwrap_or_default(),
        };
    };

    // CPU-bound HTML parsing runs off the async workers
    let answer = tokio::task::spawn_blocking(move || extractor.extract_answer(&body)).await;

    let record = match answer {
        Ok(Ok((answer, kind))) => match ExtractedFaq::admit(&link.label, &answer, kind) {
            Some(faq) => Some(faq.into_record(link.category.as_str(), link.url.as_str())),
            None => {
                tracing::warn!(url = %link.url, "Answer too short for '{}'", truncate_str(&link.label, 80));
                None
            }
        },
        Ok(Err(e)) => {
            tracing::warn!(url = %link.url, "No content extracted: {}", e);
            None
        }
        Err(e) => {
            tracing::error!(url = %link.url, "Extraction task failed: {}", e);
            None
        }
    };

    let outcome = if record.is_some() {
        DispatchOutcome::Succeeded
    } else {
        DispatchOutcome::NoContent
    };
    state.complete(&link.url, record);
    outcome
}
