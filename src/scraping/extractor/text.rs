//! Text normalization, the question classifier, and DOM traversal helpers

use regex::Regex;
use scraper::ElementRef;

/// First words that mark a sentence as a question
const QUESTION_STARTERS: &[&str] = &[
    "what", "why", "how", "when", "where", "who", "which", "can", "do", "does", "will", "is",
    "are",
];

/// Phrases that mark how-to style titles as questions
const QUESTION_PHRASES: &[&str] = &["how to", "ways to", "tips for", "guide to"];

/// Collapse whitespace runs to a single space, drop control characters and trim.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check whether text is shaped like a question.
///
/// True when the text ends with `?`, starts with a question word, or contains
/// a how-to phrase. Case-insensitive, surrounding whitespace ignored.
pub fn is_question_like(text: &str) -> bool {
    let text = text.trim().to_lowercase();

    if text.ends_with('?') {
        return true;
    }

    if let Some(first) = text.split_whitespace().next() {
        if QUESTION_STARTERS.contains(&first) {
            return true;
        }
    }

    QUESTION_PHRASES.iter().any(|phrase| text.contains(phrase))
}

/// Concatenated text of an element's subtree
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of an element's subtree, skipping the subtrees of `excluded` elements
pub(crate) fn element_text_excluding(element: &ElementRef<'_>, excluded: &[ElementRef<'_>]) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let inside_excluded = node
            .ancestors()
            .any(|ancestor| excluded.iter().any(|ex| ex.id() == ancestor.id()));
        if !inside_excluded {
            text.push_str(fragment);
        }
    }
    text
}

/// Check whether any class token of an element matches a pattern
pub(crate) fn has_class_matching(element: &ElementRef<'_>, pattern: &Regex) -> bool {
    element.value().classes().any(|class| pattern.is_match(class))
}

/// Check whether an element's tag is one of `tags`
pub(crate) fn tag_is(element: &ElementRef<'_>, tags: &[&str]) -> bool {
    tags.contains(&element.value().name())
}

/// Find the first element after `element` in document order that is accepted.
///
/// Descendants of `element` are not considered; the walk continues through
/// the following siblings of the element and of each of its ancestors.
pub(crate) fn next_element_after<'a, F>(element: ElementRef<'a>, mut accept: F) -> Option<ElementRef<'a>>
where
    F: FnMut(&ElementRef<'a>) -> bool,
{
    for node in std::iter::once(*element).chain(element.ancestors()) {
        for sibling in node.next_siblings() {
            for candidate in sibling.descendants() {
                if let Some(candidate) = ElementRef::wrap(candidate) {
                    if accept(&candidate) {
                        return Some(candidate);
                    }
                }
            }
        }
    }
    None
}
