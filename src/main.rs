//! faq-harvest: FAQ corpus builder for help-center sites
//!
//! Crawls a help-center category index, pulls the answer of every linked
//! question page and writes the result as CSV for downstream indexing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use faq_harvest::config::{Config, LogFormat, LoggingConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{crawl, extract_page, init_config, show_status, CrawlOptions};

#[derive(Parser)]
#[command(name = "faq-harvest")]
#[command(about = "Harvest question/answer pairs from help-center sites")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a category index and every question page it links to
    Crawl {
        /// Category index URL
        #[arg(long)]
        index_url: Option<String>,

        /// Base URL for resolving question links
        #[arg(long)]
        base_url: Option<String>,

        /// Concurrent workers
        #[arg(short, long)]
        workers: Option<usize>,

        /// CSV output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Checkpoint file path
        #[arg(long)]
        checkpoint: Option<PathBuf>,

        /// Ignore any existing checkpoint
        #[arg(long)]
        fresh: bool,

        /// Quiet mode (no progress bar)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Extract every FAQ pair from a single page
    Extract {
        /// Page URL
        url: String,

        /// CSV output path
        #[arg(short, long, default_value = "faqs.csv")]
        output: PathBuf,
    },

    /// Show checkpoint status
    Status {
        /// Checkpoint file path (defaults to the configured one)
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Output directory or .toml file
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn init_logging(logging: &LoggingConfig, verbose: u8) -> Result<()> {
    let level = logging.effective_level(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)?;
    init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Crawl {
            index_url,
            base_url,
            workers,
            output,
            checkpoint,
            fresh,
            quiet,
        } => {
            let options = CrawlOptions {
                index_url,
                base_url,
                workers,
                output,
                checkpoint,
                fresh,
                quiet,
            };
            crawl(config, options).await
        }
        Commands::Extract { url, output } => extract_page(config, url, output).await,
        Commands::Status { checkpoint } => {
            show_status(checkpoint.unwrap_or_else(|| config.scraping.checkpoint_path.clone()))
        }
        Commands::Init { path } => init_config(path),
    }
}
