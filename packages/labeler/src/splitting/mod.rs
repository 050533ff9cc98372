//! Article segmentation and annex trimming for EUR-Lex documents.
//!
//! Extracted lines are grouped into articles at every structural heading,
//! then everything from the first ANNEX onward is discarded.

mod annex;
mod segmenter;
mod types;

pub use annex::trim_annexes;
pub use segmenter::{segment, ArticleSegmenter};
pub use types::{Article, CleanDocument};

/// Segment lines into articles and drop the annexes.
#[must_use]
pub fn clean_document<I, S>(lines: I) -> CleanDocument
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CleanDocument::new(trim_annexes(segment(lines)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_document() {
        let doc = clean_document([
            "Article 1", "Body.", "ANNEX I", "Annex body.", "Article 2", "Ignored.",
        ]);
        assert_eq!(doc.articles.len(), 1);
        assert_eq!(doc.text(), "Article 1 Body.");
    }

    #[test]
    fn test_wrapped_annex_heading_in_markup_is_trimmed() {
        use crate::extract::{extract_lines, ContentFormat};

        let html = "<body><p>Article 1</p><p>Body.</p><p>ANNEX\nI</p><p>Annex body.</p></body>";
        let lines = extract_lines(html, ContentFormat::Markup);
        assert_eq!(lines, vec!["Article 1", "Body.", "ANNEXI", "Annex body."]);

        let doc = clean_document(lines);
        assert_eq!(doc.articles.len(), 1);
        assert_eq!(doc.text(), "Article 1 Body.");
    }
}
