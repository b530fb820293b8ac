use anyhow::Result;
use faq_harvest::scraping::checkpoint::CheckpointStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Summarize a crawl checkpoint
pub fn show_status(checkpoint_path: PathBuf) -> Result<()> {
    let store = CheckpointStore::new(&checkpoint_path);
    let Some(checkpoint) = store.load() else {
        println!("No usable checkpoint at {}", checkpoint_path.display());
        return Ok(());
    };

    let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &checkpoint.results {
        *per_category.entry(record.category.as_str()).or_default() += 1;
    }

    println!("Checkpoint: {}", checkpoint_path.display());
    println!("  Records: {}", checkpoint.results.len());
    println!("  Processed URLs: {}", checkpoint.processed_urls.len());
    println!(
        "  Without record: {}",
        checkpoint.processed_urls.len().saturating_sub(checkpoint.results.len())
    );

    if !per_category.is_empty() {
        println!("\nRecords by category:");
        for (category, count) in per_category {
            let label = if category.is_empty() { "(none)" } else { category };
            println!("  {}: {}", label, count);
        }
    }

    Ok(())
}
