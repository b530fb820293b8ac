//! FAQ extraction strategies
//!
//! Each strategy recognizes one family of question/answer markup. The
//! [`ContentExtractor`](super::ContentExtractor) runs them in priority order and
//! keeps the output of the first strategy that admits at least one pair.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;

use super::text::{
    clean_text, element_text, element_text_excluding, has_class_matching, is_question_like, next_element_after,
    tag_is,
};
use super::types::{ExtractedFaq, StrategyKind};

/// Id/class fragments that mark a container as an FAQ section
const FAQ_CONTAINER_TERMS: &[&str] = &["faq", "faqs", "frequently-asked", "questions-answers", "q-and-a"];

/// Heading text that introduces an FAQ section
const FAQ_HEADING_TERMS: &[&str] = &["faq", "frequently asked questions", "questions & answers"];

const CONTAINER_TAGS: &[&str] = &["div", "section", "article"];
const BLOCK_TAGS: &[&str] = &["p", "div"];
const TEXT_ANSWER_TAGS: &[&str] = &["p", "div", "span"];

/// Minimum cleaned answer length for the heading heuristic
const HEADING_ANSWER_MIN_CHARS: usize = 10;
/// Minimum cleaned answer length for the free-text heuristic
const TEXT_ANSWER_MIN_CHARS: usize = 15;

/// Compiled selectors and class patterns shared by all strategies
struct Patterns {
    any_element: Selector,
    containers: Selector,
    faq_headings: Selector,
    sibling_questions: Selector,
    question_class: Regex,
    answer_class: Regex,
    sibling_question_class: Regex,
    divs: Selector,
    accordion_item_class: Regex,
    accordion_item_parts: Selector,
    accordion_header_class: Regex,
    accordion_body_class: Regex,
    ui_headers: Selector,
    ui_header_class: Regex,
    ui_content_class: Regex,
    toggle_buttons: Selector,
    expanded_state: Regex,
    with_id: Selector,
    details: Selector,
    summary: Selector,
    definition_lists: Selector,
    terms: Selector,
    definitions: Selector,
    question_headings: Selector,
    text_candidates: Selector,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        any_element: Selector::parse("*").unwrap(),
        containers: Selector::parse("div, section, article").unwrap(),
        faq_headings: Selector::parse("h1, h2, h3").unwrap(),
        sibling_questions: Selector::parse("h3, h4, strong, p, div, button").unwrap(),
        question_class: Regex::new(r"question|faq-q|accordion-header|toggle-header").unwrap(),
        answer_class: Regex::new(r"answer|faq-a|accordion-content|toggle-content").unwrap(),
        sibling_question_class: Regex::new(r"question|faq-q|q-text").unwrap(),
        divs: Selector::parse("div").unwrap(),
        accordion_item_class: Regex::new(r"accordion-item").unwrap(),
        accordion_item_parts: Selector::parse("button, h2, h3, h4, div").unwrap(),
        accordion_header_class: Regex::new(r"accordion-header|accordion-button").unwrap(),
        accordion_body_class: Regex::new(r"accordion-body|accordion-content|collapse").unwrap(),
        ui_headers: Selector::parse("h3").unwrap(),
        ui_header_class: Regex::new(r"ui-accordion-header").unwrap(),
        ui_content_class: Regex::new(r"ui-accordion-content").unwrap(),
        toggle_buttons: Selector::parse("button[aria-expanded]").unwrap(),
        expanded_state: Regex::new(r"true|false").unwrap(),
        with_id: Selector::parse("[id]").unwrap(),
        details: Selector::parse("details").unwrap(),
        summary: Selector::parse("summary").unwrap(),
        definition_lists: Selector::parse("dl").unwrap(),
        terms: Selector::parse("dt").unwrap(),
        definitions: Selector::parse("dd").unwrap(),
        question_headings: Selector::parse("h2, h3, h4, h5").unwrap(),
        text_candidates: Selector::parse("p, div, span, strong, b").unwrap(),
    })
}

/// A single extraction heuristic
pub trait FaqStrategy: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Extract admitted pairs; an empty result means the strategy did not match
    fn try_extract(&self, document: &Html) -> Vec<ExtractedFaq>;
}

/// Accumulates admitted pairs, dropping exact repeats
#[derive(Default)]
struct FaqCollector {
    faqs: Vec<ExtractedFaq>,
    seen: HashSet<(String, String)>,
}

impl FaqCollector {
    fn add(&mut self, question: &str, answer: &str, strategy: StrategyKind) {
        let Some(faq) = ExtractedFaq::admit(question, answer, strategy) else {
            return;
        };
        if self.seen.insert((faq.question.clone(), faq.answer.clone())) {
            tracing::trace!("Admitted FAQ [{}]: {}", strategy, faq.question);
            self.faqs.push(faq);
        }
    }

    fn finish(self) -> Vec<ExtractedFaq> {
        self.faqs
    }
}

fn elements_with_class<'a>(
    scope: impl Iterator<Item = ElementRef<'a>>,
    pattern: &Regex,
) -> Vec<ElementRef<'a>> {
    scope.filter(|el| has_class_matching(el, pattern)).collect()
}

/// Containers whose id or class names mark them as FAQ sections, or the
/// sections around an FAQ heading.
pub struct StructuredContainers;

impl StructuredContainers {
    fn find_containers<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let p = patterns();

        let containers: Vec<ElementRef<'a>> = document
            .select(&p.containers)
            .filter(|container| {
                let id = container.value().id().unwrap_or_default().to_lowercase();
                let class = container
                    .value()
                    .classes()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase();
                FAQ_CONTAINER_TERMS
                    .iter()
                    .any(|term| id.contains(term) || class.contains(term))
            })
            .collect();

        if !containers.is_empty() {
            return containers;
        }

        document
            .select(&p.faq_headings)
            .filter(|heading| {
                let text = element_text(heading).to_lowercase();
                FAQ_HEADING_TERMS.iter().any(|term| text.contains(term))
            })
            .filter_map(|heading| {
                heading
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|parent| tag_is(parent, CONTAINER_TAGS))
            })
            .collect()
    }
}

impl FaqStrategy for StructuredContainers {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn try_extract(&self, document: &Html) -> Vec<ExtractedFaq> {
        let p = patterns();
        let mut collector = FaqCollector::default();

        for container in self.find_containers(document) {
            let questions = elements_with_class(container.select(&p.any_element), &p.question_class);
            let answers = elements_with_class(container.select(&p.any_element), &p.answer_class);

            if !questions.is_empty() && questions.len() == answers.len() {
                for (question, answer) in questions.iter().zip(&answers) {
                    collector.add(
                        &element_text(question),
                        &element_text(answer),
                        StrategyKind::StructuredClassPairs,
                    );
                }
                continue;
            }

            let tagged = elements_with_class(container.select(&p.sibling_questions), &p.sibling_question_class);
            for question in tagged {
                let Some(answer) = next_element_after(question, |el| tag_is(el, BLOCK_TAGS)) else {
                    continue;
                };
                let answer_text = element_text(&answer);
                if !is_question_like(&answer_text) {
                    collector.add(&element_text(&question), &answer_text, StrategyKind::StructuredSiblings);
                }
            }
        }

        collector.finish()
    }
}

/// Accordion widgets and native `<details>` disclosures
pub struct Accordions;

impl Accordions {
    fn item_containers(&self, document: &Html, collector: &mut FaqCollector) {
        let p = patterns();

        for item in elements_with_class(document.select(&p.divs), &p.accordion_item_class) {
            let header = item
                .select(&p.accordion_item_parts)
                .find(|el| has_class_matching(el, &p.accordion_header_class));
            let body = item
                .select(&p.divs)
                .find(|el| has_class_matching(el, &p.accordion_body_class));

            if let (Some(header), Some(body)) = (header, body) {
                collector.add(&element_text(&header), &element_text(&body), StrategyKind::AccordionItem);
            }
        }
    }

    fn header_content_pairs(&self, document: &Html, collector: &mut FaqCollector) {
        let p = patterns();
        let headers = elements_with_class(document.select(&p.ui_headers), &p.ui_header_class);
        let contents = elements_with_class(document.select(&p.divs), &p.ui_content_class);

        if headers.is_empty() || headers.len() != contents.len() {
            return;
        }

        for (header, content) in headers.iter().zip(&contents) {
            collector.add(&element_text(header), &element_text(content), StrategyKind::AccordionPair);
        }
    }

    fn toggle_buttons(&self, document: &Html, collector: &mut FaqCollector) {
        let p = patterns();

        for button in document.select(&p.toggle_buttons) {
            let expanded = button.value().attr("aria-expanded").unwrap_or_default();
            if !p.expanded_state.is_match(expanded) {
                continue;
            }
            let Some(target_id) = button.value().attr("aria-controls") else {
                continue;
            };
            let target = document
                .select(&p.with_id)
                .find(|el| el.value().id() == Some(target_id));

            if let Some(target) = target {
                collector.add(&element_text(&button), &element_text(&target), StrategyKind::AccordionControl);
            }
        }
    }

    fn disclosures(&self, document: &Html, collector: &mut FaqCollector) {
        let p = patterns();

        for details in document.select(&p.details) {
            let Some(summary) = details.select(&p.summary).next() else {
                continue;
            };
            let answer = element_text_excluding(&details, &[summary]);
            collector.add(&element_text(&summary), &answer, StrategyKind::DetailsSummary);
        }
    }
}

impl FaqStrategy for Accordions {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn try_extract(&self, document: &Html) -> Vec<ExtractedFaq> {
        let mut collector = FaqCollector::default();
        self.item_containers(document, &mut collector);
        self.header_content_pairs(document, &mut collector);
        self.toggle_buttons(document, &mut collector);
        self.disclosures(document, &mut collector);
        collector.finish()
    }
}

/// `<dt>`/`<dd>` pairs inside one `<dl>`
pub struct DefinitionLists;

impl FaqStrategy for DefinitionLists {
    fn name(&self) -> &'static str {
        "definition-list"
    }

    fn try_extract(&self, document: &Html) -> Vec<ExtractedFaq> {
        let p = patterns();
        let mut collector = FaqCollector::default();

        for list in document.select(&p.definition_lists) {
            let terms: Vec<_> = list.select(&p.terms).collect();
            let definitions: Vec<_> = list.select(&p.definitions).collect();

            if terms.is_empty() || terms.len() != definitions.len() {
                continue;
            }

            for (term, definition) in terms.iter().zip(&definitions) {
                collector.add(&element_text(term), &element_text(definition), StrategyKind::DefinitionList);
            }
        }

        collector.finish()
    }
}

/// Question-shaped `h2`-`h5` headings followed by a paragraph
pub struct HeadingParagraphs;

impl FaqStrategy for HeadingParagraphs {
    fn name(&self) -> &'static str {
        "heading-paragraph"
    }

    fn try_extract(&self, document: &Html) -> Vec<ExtractedFaq> {
        let p = patterns();
        let mut collector = FaqCollector::default();

        for heading in document.select(&p.question_headings) {
            let heading_text = element_text(&heading);
            if !is_question_like(&heading_text) {
                continue;
            }

            // Intervening sub-headings are skipped
            let Some(block) = next_element_after(heading, |el| tag_is(el, BLOCK_TAGS)) else {
                continue;
            };

            let answer_text = element_text(&block);
            if !is_question_like(&answer_text)
                && clean_text(&answer_text).chars().count() > HEADING_ANSWER_MIN_CHARS
            {
                collector.add(&heading_text, &answer_text, StrategyKind::HeadingParagraph);
            }
        }

        collector.finish()
    }
}

/// Any question-shaped text element followed by a longer statement
pub struct QuestionText;

impl FaqStrategy for QuestionText {
    fn name(&self) -> &'static str {
        "text-pattern"
    }

    fn try_extract(&self, document: &Html) -> Vec<ExtractedFaq> {
        let p = patterns();
        let mut collector = FaqCollector::default();

        for candidate in document.select(&p.text_candidates) {
            let question_text = element_text(&candidate);
            if !is_question_like(&question_text) {
                continue;
            }

            let Some(answer) = next_element_after(candidate, |el| tag_is(el, TEXT_ANSWER_TAGS)) else {
                continue;
            };
            let answer_text = element_text(&answer);
            if !is_question_like(&answer_text)
                && clean_text(&answer_text).chars().count() > TEXT_ANSWER_MIN_CHARS
            {
                collector.add(&question_text, &answer_text, StrategyKind::TextPattern);
            }
        }

        collector.finish()
    }
}

/// The strategies in priority order
pub fn default_strategies() -> Vec<Box<dyn FaqStrategy>> {
    vec![
        Box::new(StructuredContainers),
        Box::new(Accordions),
        Box::new(DefinitionLists),
        Box::new(HeadingParagraphs),
        Box::new(QuestionText),
    ]
}
