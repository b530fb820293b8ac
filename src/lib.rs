//! faq-harvest: FAQ corpus builder for help-center sites
//!
//! - Category index enumeration and concurrent question-page crawling
//! - Five-strategy FAQ extraction cascade for arbitrary pages
//! - Resumable crawls via JSON checkpoints
//! - CSV output for the downstream RAG indexer

pub mod config;
pub mod scraping;
pub mod util;

pub use config::Config;
