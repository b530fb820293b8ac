//! Category index enumeration
//!
//! Help-center topic pages render each category as an accordion button with a
//! `data-testid` of `accordion-button-<id>`, and its question list in a
//! region tagged `accordion-content-<id>`. Pages without that pairing yield
//! no categories.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

use super::text::{clean_text, element_text, has_class_matching};
use super::types::QuestionLink;

const BUTTON_TESTID_PREFIX: &str = "accordion-button-";
const CONTENT_TESTID_PREFIX: &str = "accordion-content-";

struct IndexPatterns {
    category_buttons: Selector,
    label: Selector,
    regions: Selector,
    links: Selector,
    link_class: Regex,
}

static INDEX_PATTERNS: OnceLock<IndexPatterns> = OnceLock::new();

fn index_patterns() -> &'static IndexPatterns {
    INDEX_PATTERNS.get_or_init(|| IndexPatterns {
        category_buttons: Selector::parse("button[data-testid^='accordion-button-']").unwrap(),
        label: Selector::parse("h2").unwrap(),
        regions: Selector::parse("div[data-testid]").unwrap(),
        links: Selector::parse("a[href]").unwrap(),
        link_class: Regex::new(r"np-link").unwrap(),
    })
}

/// Category label: the button's `h2`, or the whole button text without one
fn category_label(button: &ElementRef<'_>) -> String {
    let p = index_patterns();
    let raw = button
        .select(&p.label)
        .next()
        .map(|heading| element_text(&heading))
        .unwrap_or_else(|| element_text(button));
    clean_text(&raw)
}

/// Enumerate `(category, question label, url)` triples from an index page.
///
/// Links are resolved against `base_url`. Order follows the page.
pub fn extract_question_links(html: &str, base_url: &Url) -> Vec<QuestionLink> {
    let document = Html::parse_document(html);
    let p = index_patterns();
    let mut links = Vec::new();

    for button in document.select(&p.category_buttons) {
        let Some(category_id) = button
            .value()
            .attr("data-testid")
            .and_then(|testid| testid.strip_prefix(BUTTON_TESTID_PREFIX))
        else {
            continue;
        };

        let category = category_label(&button);
        tracing::info!("Found category: {}", category);

        let region_testid = format!("{}{}", CONTENT_TESTID_PREFIX, category_id);
        let region = document
            .select(&p.regions)
            .find(|region| region.value().attr("data-testid") == Some(region_testid.as_str()));

        let Some(region) = region else {
            tracing::warn!("Could not find content for category: {}", category);
            continue;
        };

        for anchor in region.select(&p.links) {
            if !has_class_matching(&anchor, &p.link_class) {
                continue;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            match base_url.join(href) {
                Ok(url) => links.push(QuestionLink {
                    category: category.clone(),
                    label: clean_text(&element_text(&anchor)),
                    url: url.to_string(),
                }),
                Err(e) => tracing::debug!("Skipping unresolvable link {}: {}", href, e),
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://help.example.com").unwrap()
    }

    #[test]
    fn test_patterns_compile() {
        assert!(index_patterns().link_class.is_match("np-link"));
    }

    #[test]
    fn test_enumerates_categories_and_links() {
        let html = r#"
            <button data-testid="accordion-button-abc"><h2>Sending money</h2></button>
            <div data-testid="accordion-content-abc" inert>
                <a class="np-link np-text" href="/help/articles/1/how-long">How long does it take?</a>
                <a class="np-link" href="https://help.example.com/help/articles/2/fees">What are the fees?</a>
                <a class="other" href="/ignored">Ignored link</a>
            </div>
            <button data-testid="accordion-button-xyz"><h2> Managing
                your account </h2></button>
            <div data-testid="accordion-content-xyz">
                <a class="np-link" href="/help/articles/3/close">Closing an account</a>
            </div>
        "#;

        let links = extract_question_links(html, &base());
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].category, "Sending money");
        assert_eq!(links[0].label, "How long does it take?");
        assert_eq!(links[0].url, "https://help.example.com/help/articles/1/how-long");
        assert_eq!(links[1].url, "https://help.example.com/help/articles/2/fees");
        assert_eq!(links[2].category, "Managing your account");
    }

    #[test]
    fn test_category_without_region_is_skipped() {
        let html = r#"
            <button data-testid="accordion-button-1"><h2>Orphan</h2></button>
            <div data-testid="accordion-content-2">
                <a class="np-link" href="/a">Elsewhere</a>
            </div>
        "#;
        assert!(extract_question_links(html, &base()).is_empty());
    }

    #[test]
    fn test_page_without_convention_yields_nothing() {
        let html = r#"<ul><li><a class="np-link" href="/x">A question?</a></li></ul>"#;
        assert!(extract_question_links(html, &base()).is_empty());
    }

    #[test]
    fn test_label_falls_back_to_button_text() {
        let html = r#"
            <button data-testid="accordion-button-q">Security</button>
            <div data-testid="accordion-content-q"><a class="np-link" href="/s">Is it safe?</a></div>
        "#;
        let links = extract_question_links(html, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].category, "Security");
    }
}
