//! HTML adapter.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::LineExtractor;

/// Paragraph-level content nodes.
#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));

/// Extracts one line per `<p>` element of an HTML document.
///
/// Head content never contributes lines. Comments and the doctype are not
/// text nodes, so they never reach the output either.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupExtractor;

impl LineExtractor for MarkupExtractor {
    fn extract(&self, content: &str) -> Vec<String> {
        let document = Html::parse_document(content);

        document
            .select(&PARAGRAPH_SELECTOR)
            .filter(|p| !in_head(*p))
            .filter_map(paragraph_line)
            .collect()
    }
}

fn in_head(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| e.name() == "head")
    })
}

/// Concatenated text of a paragraph, or `None` when it is blank.
fn paragraph_line(paragraph: ElementRef<'_>) -> Option<String> {
    let text: String = paragraph.text().collect();
    let line: String = text
        .trim()
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .collect();

    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}
