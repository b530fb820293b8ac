//! Answer body of a help-center article page

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use super::text::{element_text, element_text_excluding, has_class_matching, tag_is};

struct ArticlePatterns {
    divs: Selector,
    chrome: Selector,
    article_class: Regex,
    column_class: Regex,
    row_class: Regex,
    chrome_class: Regex,
}

static ARTICLE_PATTERNS: OnceLock<ArticlePatterns> = OnceLock::new();

fn article_patterns() -> &'static ArticlePatterns {
    ARTICLE_PATTERNS.get_or_init(|| ArticlePatterns {
        divs: Selector::parse("div").unwrap(),
        chrome: Selector::parse("h1, nav, div").unwrap(),
        article_class: Regex::new(r"article-content").unwrap(),
        column_class: Regex::new(r"col-lg-8|col-lg-10").unwrap(),
        row_class: Regex::new(r"row").unwrap(),
        chrome_class: Regex::new(r"breadcrumbs|header").unwrap(),
    })
}

fn first_div_with_class<'a>(
    scope: impl Iterator<Item = ElementRef<'a>>,
    pattern: &Regex,
) -> Option<ElementRef<'a>> {
    scope
        .filter(|el| tag_is(el, &["div"]))
        .find(|el| has_class_matching(el, pattern))
}

/// Raw text of the article body, if the page has a recognizable one.
///
/// Prefers a `div.article-content`; otherwise takes the main layout column
/// and, when it has a `row`, drops breadcrumb and header chrome from it.
pub fn article_body_text(document: &Html) -> Option<String> {
    let p = article_patterns();

    if let Some(content) = first_div_with_class(document.select(&p.divs), &p.article_class) {
        return Some(element_text(&content));
    }

    let column = first_div_with_class(document.select(&p.divs), &p.column_class)?;

    match first_div_with_class(column.select(&p.divs), &p.row_class) {
        Some(row) => {
            let chrome: Vec<ElementRef<'_>> = row
                .select(&p.chrome)
                .filter(|el| has_class_matching(el, &p.chrome_class))
                .collect();
            Some(element_text_excluding(&row, &chrome))
        }
        None => Some(element_text(&column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::extractor::text::clean_text;

    fn body(html: &str) -> Option<String> {
        article_body_text(&Html::parse_document(html)).map(|t| clean_text(&t))
    }

    #[test]
    fn test_patterns_compile() {
        assert!(article_patterns().article_class.is_match("article-content"));
    }

    #[test]
    fn test_article_content_div() {
        let html = r#"
            <div class="layout"><div class="help-article-content">
                <p>Transfers usually arrive in 1-2 days.</p>
            </div></div>
        "#;
        assert_eq!(body(html).as_deref(), Some("Transfers usually arrive in 1-2 days."));
    }

    #[test]
    fn test_column_row_strips_chrome() {
        let html = r#"
            <div class="col-lg-8">
                <div class="row">
                    <nav class="breadcrumbs">Help &gt; Sending</nav>
                    <h1 class="article-header">Title text</h1>
                    <p>The real answer text lives here.</p>
                </div>
            </div>
        "#;
        assert_eq!(body(html).as_deref(), Some("The real answer text lives here."));
    }

    #[test]
    fn test_column_without_row() {
        let html = r#"<div class="col-lg-10"><p>Whole column is the answer.</p></div>"#;
        assert_eq!(body(html).as_deref(), Some("Whole column is the answer."));
    }

    #[test]
    fn test_no_article_structure() {
        assert!(body("<main><p>Unstructured page</p></main>").is_none());
    }
}
