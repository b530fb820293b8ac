//! CSV output for the downstream indexer
//!
//! Column names and order are part of the contract with the indexing side.

use std::path::Path;
use thiserror::Error;

use super::extractor::FaqRecord;

/// Errors while writing the output corpus
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Column layout of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// `category,question,answer,url`, written by the category crawl
    Crawl,
    /// `question,answer,url,source_type`, written by single-page extraction
    SinglePage,
}

impl CsvLayout {
    pub fn header(&self) -> [&'static str; 4] {
        match self {
            Self::Crawl => ["category", "question", "answer", "url"],
            Self::SinglePage => ["question", "answer", "url", "source_type"],
        }
    }

    fn row<'a>(&self, record: &'a FaqRecord) -> [&'a str; 4] {
        match self {
            Self::Crawl => [
                record.category.as_str(),
                record.question.as_str(),
                record.answer.as_str(),
                record.url.as_str(),
            ],
            Self::SinglePage => [
                record.question.as_str(),
                record.answer.as_str(),
                record.url.as_str(),
                record.source_type.as_str(),
            ],
        }
    }
}

/// Writes the full record set to a CSV file, replacing any existing file
pub struct ResultSink {
    layout: CsvLayout,
}

impl ResultSink {
    pub fn new(layout: CsvLayout) -> Self {
        Self { layout }
    }

    /// Write the header and every record in order; returns the row count
    pub fn write(&self, records: &[FaqRecord], path: &Path) -> Result<usize, SinkError> {
        tracing::info!("Saving {} results to {}", records.len(), path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::WriterBuilder::new().from_path(path)?;
        writer.write_record(self.layout.header())?;
        for record in records {
            writer.write_record(self.layout.row(record))?;
        }
        writer.flush()?;

        tracing::info!("Data saved to {}", path.display());
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::extractor::StrategyKind;
    use tempfile::TempDir;

    fn record() -> FaqRecord {
        FaqRecord {
            category: "Sending money".to_string(),
            question: "How long does it take?".to_string(),
            answer: "Usually 1-2 days, sometimes \"instantly\", depending on route.".to_string(),
            url: "https://example.com/q/1".to_string(),
            source_type: StrategyKind::DetailsSummary,
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_crawl_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let written = ResultSink::new(CsvLayout::Crawl).write(&[record()], &path).unwrap();
        assert_eq!(written, 1);

        let rows = read_rows(&path);
        assert_eq!(rows[0], vec!["category", "question", "answer", "url"]);
        assert_eq!(rows[1][0], "Sending money");
        assert_eq!(rows[1][2], "Usually 1-2 days, sometimes \"instantly\", depending on route.");
    }

    #[test]
    fn test_single_page_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faqs.csv");

        ResultSink::new(CsvLayout::SinglePage).write(&[record()], &path).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows[0], vec!["question", "answer", "url", "source_type"]);
        assert_eq!(rows[1][3], "details-summary");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale,content\n1,2\n3,4\n5,6\n").unwrap();

        ResultSink::new(CsvLayout::Crawl).write(&[], &path).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "category");
    }
}
