//! FAQ content extraction from HTML
//!
//! Three entry points:
//! - [`ContentExtractor::extract_faqs`]: runs the strategy cascade over an
//!   arbitrary page and returns every admitted question/answer pair
//! - [`ContentExtractor::extract_answer`]: finds the single answer body of a
//!   help-center article page
//! - [`extract_question_links`]: enumerates question links on a category index

mod article;
mod index;
pub mod strategies;
pub mod text;
mod types;

pub use index::extract_question_links;
pub use strategies::FaqStrategy;
pub use text::{clean_text, is_question_like};
pub use types::*;

use scraper::Html;

/// Content extractor running an ordered list of strategies
pub struct ContentExtractor {
    strategies: Vec<Box<dyn FaqStrategy>>,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(strategies::default_strategies())
    }
}

impl ContentExtractor {
    /// Create an extractor with a custom strategy order
    pub fn new(strategies: Vec<Box<dyn FaqStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run the cascade over a page; the first strategy with any admitted pair wins
    pub fn extract_faqs(&self, html: &str) -> Vec<ExtractedFaq> {
        let document = Html::parse_document(html);
        self.extract_from_document(&document)
    }

    fn extract_from_document(&self, document: &Html) -> Vec<ExtractedFaq> {
        for strategy in &self.strategies {
            let faqs = strategy.try_extract(document);
            if !faqs.is_empty() {
                tracing::debug!("Strategy '{}' matched {} FAQs", strategy.name(), faqs.len());
                return faqs;
            }
            tracing::trace!("Strategy '{}' found nothing", strategy.name());
        }
        Vec::new()
    }

    /// Find the answer text of a question detail page.
    ///
    /// Uses the article body when the page has one, otherwise the first answer
    /// the cascade produces. Returns the raw (uncleaned) answer and the
    /// strategy that found it.
    pub fn extract_answer(&self, html: &str) -> Result<(String, StrategyKind), ExtractError> {
        let document = Html::parse_document(html);

        if let Some(body) = article::article_body_text(&document) {
            if !clean_text(&body).is_empty() {
                return Ok((body, StrategyKind::ArticleBody));
            }
        }

        self.extract_from_document(&document)
            .into_iter()
            .next()
            .map(|faq| (faq.answer, faq.strategy))
            .ok_or(ExtractError::NoContent)
    }
}
