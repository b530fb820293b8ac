use anyhow::{Context, Result};
use faq_harvest::{
    config::Config,
    scraping::{
        extractor::{ContentExtractor, FaqRecord},
        fetcher::FetchEngine,
        sink::{CsvLayout, ResultSink},
    },
    util::truncate_str,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Extract every FAQ pair from a single page
pub async fn extract_page(config: Config, url: String, output: PathBuf) -> Result<()> {
    let fetcher = FetchEngine::new(config.scraping.fetch_config()).context("Failed to build HTTP client")?;

    info!("Extracting FAQs from {}", url);
    let page = fetcher.fetch(&url).await;
    let Some(html) = page.body else {
        anyhow::bail!(
            "Failed to fetch {}: {}",
            url,
            page.error.unwrap_or_else(|| "unknown error".to_string())
        );
    };

    let faqs = tokio::task::spawn_blocking(move || ContentExtractor::default().extract_faqs(&html))
        .await
        .context("Extraction task failed")?;

    if faqs.is_empty() {
        warn!("No FAQs found on {}", url);
        anyhow::bail!("No FAQs found on {}", url);
    }

    let strategy = faqs[0].strategy;
    let records: Vec<FaqRecord> = faqs
        .into_iter()
        .map(|faq| faq.into_record(String::new(), url.as_str()))
        .collect();

    ResultSink::new(CsvLayout::SinglePage)
        .write(&records, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Found {} FAQs using {}:", records.len(), strategy);
    for (i, record) in records.iter().take(3).enumerate() {
        println!("  {}. {}", i + 1, truncate_str(&record.question, 100));
    }
    println!("Saved to {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> Config {
        let mut config = Config::default();
        config.scraping.max_retries = 1;
        config.scraping.retry_backoff_base_ms = 0;
        config
    }

    async fn serve(html: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/faq"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html.to_string()))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_page_without_faqs_is_an_error() {
        let server = serve("<html><body><p>Welcome to our site.</p></body></html>").await;
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("faqs.csv");

        let err = extract_page(test_config(), format!("{}/faq", server.uri()), output.clone())
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("No FAQs found on"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("faqs.csv");

        let err = extract_page(test_config(), format!("{}/missing", server.uri()), output.clone())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("HTTP 404"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_definition_list_page_writes_csv() {
        let server = serve(
            "<dl><dt>How long does a transfer take?</dt><dd>Most transfers arrive within two days.</dd></dl>",
        )
        .await;
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("faqs.csv");

        extract_page(test_config(), format!("{}/faq", server.uri()), output.clone())
            .await
            .unwrap();

        let csv = std::fs::read_to_string(&output).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("question,answer,url,source_type"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("How long does a transfer take?,Most transfers arrive within two days.,"));
        assert!(row.ends_with(",definition-list"));
    }
}
