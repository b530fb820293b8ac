//! Help-center scraping pipeline
//!
//! Key components:
//! - `FetchEngine`: HTTP fetching with retries and backoff
//! - `ContentExtractor`: question/answer extraction from HTML
//! - `CrawlCoordinator`: index enumeration and the bounded worker pool
//! - `CheckpointStore`: resumable crawl state on disk
//! - `ResultSink`: CSV output

pub mod checkpoint;
pub mod coordinator;
pub mod extractor;
pub mod fetcher;
pub mod sink;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use coordinator::CrawlCoordinator;
pub use extractor::ContentExtractor;
pub use fetcher::FetchEngine;
pub use sink::{CsvLayout, ResultSink};
