//! Extraction types: strategy tags, extracted pairs, and FAQ records

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::text::clean_text;

/// Minimum cleaned question length (characters)
pub const MIN_QUESTION_CHARS: usize = 5;
/// Minimum cleaned answer length (characters)
pub const MIN_ANSWER_CHARS: usize = 10;

/// Errors during content extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No FAQ content found")]
    NoContent,
}

/// Which heuristic produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    StructuredClassPairs,
    StructuredSiblings,
    AccordionItem,
    AccordionPair,
    AccordionControl,
    DetailsSummary,
    DefinitionList,
    HeadingParagraph,
    TextPattern,
    /// Answer body of a help-center article page
    #[default]
    ArticleBody,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredClassPairs => "structured-class-pairs",
            Self::StructuredSiblings => "structured-siblings",
            Self::AccordionItem => "accordion-item",
            Self::AccordionPair => "accordion-pair",
            Self::AccordionControl => "accordion-control",
            Self::DetailsSummary => "details-summary",
            Self::DefinitionList => "definition-list",
            Self::HeadingParagraph => "heading-paragraph",
            Self::TextPattern => "text-pattern",
            Self::ArticleBody => "article-body",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned question/answer pair that passed admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFaq {
    pub question: String,
    pub answer: String,
    pub strategy: StrategyKind,
}

impl ExtractedFaq {
    /// Clean both sides and admit the pair only if it meets the length minimums
    pub fn admit(question: &str, answer: &str, strategy: StrategyKind) -> Option<Self> {
        let question = clean_text(question);
        let answer = clean_text(answer);

        if question.chars().count() < MIN_QUESTION_CHARS || answer.chars().count() < MIN_ANSWER_CHARS {
            return None;
        }

        Some(Self {
            question,
            answer,
            strategy,
        })
    }

    /// Attach provenance to produce a record
    pub fn into_record(self, category: impl Into<String>, url: impl Into<String>) -> FaqRecord {
        FaqRecord {
            category: category.into(),
            question: self.question,
            answer: self.answer,
            url: url.into(),
            source_type: self.strategy,
        }
    }
}

/// One normalized FAQ entry with provenance.
///
/// Only constructed through [`ExtractedFaq::into_record`] or deserialized from
/// a checkpoint, so the length invariant holds for every record produced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    #[serde(default)]
    pub category: String,
    pub question: String,
    pub answer: String,
    /// Page the answer was taken from
    pub url: String,
    #[serde(default)]
    pub source_type: StrategyKind,
}

/// A question link found on a category index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLink {
    pub category: String,
    pub label: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_boundaries() {
        assert!(ExtractedFaq::admit("Fees?", "0123456789", StrategyKind::TextPattern).is_some());
        assert!(ExtractedFaq::admit("Fee?", "0123456789", StrategyKind::TextPattern).is_none());
        assert!(ExtractedFaq::admit("Fees?", "012345678", StrategyKind::TextPattern).is_none());
    }

    #[test]
    fn test_admission_measures_cleaned_text() {
        // Whitespace padding does not count toward the minimums
        assert!(ExtractedFaq::admit("  Fee?   ", "  0123456789  ", StrategyKind::TextPattern).is_none());

        let faq = ExtractedFaq::admit(" What\n is  it? ", "An  answer\tthat is long", StrategyKind::DefinitionList)
            .unwrap();
        assert_eq!(faq.question, "What is it?");
        assert_eq!(faq.answer, "An answer that is long");
    }

    #[test]
    fn test_strategy_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&StrategyKind::DetailsSummary).unwrap();
        assert_eq!(json, "\"details-summary\"");
        assert_eq!(StrategyKind::DefinitionList.to_string(), "definition-list");
    }

    #[test]
    fn test_record_without_source_type_deserializes() {
        let json = r#"{"category":"Sending money","question":"How long?","answer":"Usually one or two days.","url":"https://example.com/q"}"#;
        let record: FaqRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.source_type, StrategyKind::ArticleBody);
        assert_eq!(record.category, "Sending money");
    }
}
