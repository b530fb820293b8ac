use anyhow::{Context, Result};
use faq_harvest::{
    config::Config,
    scraping::coordinator::{CrawlConfig, CrawlCoordinator, CrawlProgress, CrawlStats},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Command-line overrides for a crawl
#[derive(Debug, Default)]
pub struct CrawlOptions {
    pub index_url: Option<String>,
    pub base_url: Option<String>,
    pub workers: Option<usize>,
    pub output: Option<PathBuf>,
    pub checkpoint: Option<PathBuf>,
    pub fresh: bool,
    pub quiet: bool,
}

pub async fn crawl(mut config: Config, options: CrawlOptions) -> Result<()> {
    let scraping = &mut config.scraping;
    if let Some(index_url) = options.index_url {
        scraping.index_url = index_url;
    }
    if let Some(base_url) = options.base_url {
        scraping.base_url = base_url;
    }
    if let Some(workers) = options.workers {
        scraping.max_workers = workers;
    }
    if let Some(output) = options.output {
        scraping.output_path = output;
    }
    if let Some(checkpoint) = options.checkpoint {
        scraping.checkpoint_path = checkpoint;
    }
    config.validate()?;

    let mut crawl_config = CrawlConfig::from_config(&config.scraping)?;
    crawl_config.resume = !options.fresh;

    println!("\nCrawl Configuration:");
    println!("  Index: {}", crawl_config.index_url);
    println!("  Workers: {}", crawl_config.max_workers);
    println!("  Checkpoint: {}", crawl_config.checkpoint_path.display());
    println!("  Output: {}", crawl_config.output_path.display());
    println!();

    let mut coordinator = CrawlCoordinator::new(crawl_config).context("Failed to create crawl coordinator")?;

    let progress_bar = (!options.quiet).then(|| {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    });
    if let Some(pb) = progress_bar.clone() {
        coordinator = coordinator.with_progress(Arc::new(move |progress: &CrawlProgress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.completed as u64);
            pb.set_message(format!("{} ok | {} failed", progress.succeeded, progress.failed));
        }));
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, stopping crawl");
            interrupt.cancel();
        }
    });

    let outcome = coordinator.run(cancel).await?;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    print_stats(&outcome.stats, coordinator.fetch_stats().requests);

    if outcome.stats.interrupted {
        println!(
            "\nCrawl interrupted; progress saved to {}. Run again to resume.",
            coordinator.config().checkpoint_path.display()
        );
    } else if outcome.output_written {
        info!("Wrote {} records", outcome.records.len());
        println!(
            "\nSaved {} FAQ records to {}",
            outcome.records.len(),
            coordinator.config().output_path.display()
        );
    }

    Ok(())
}

fn print_stats(stats: &CrawlStats, requests: u64) {
    println!("\nCrawl Statistics:");
    println!("  Restored records: {}", stats.restored_records);
    println!("  Categories: {}", stats.categories);
    println!("  Question links: {}", stats.candidates);
    println!("  Already processed: {}", stats.skipped_already_processed);
    println!("  Pages fetched: {}", stats.fetched);
    println!("  Succeeded: {}", stats.succeeded);
    println!("  Failed: {}", stats.failed);
    println!("  Checkpoints saved: {}", stats.checkpoints_saved);
    println!("  HTTP requests: {}", requests);
}
