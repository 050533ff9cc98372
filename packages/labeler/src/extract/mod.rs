//! Line extraction from raw document content.
//!
//! Both adapters reduce a document to an ordered list of non-empty lines
//! without line terminators, which is what the article segmenter consumes.

mod html;
mod text;

pub use html::MarkupExtractor;
pub use text::PlainTextExtractor;

/// Reduces raw content to candidate lines.
pub trait LineExtractor {
    fn extract(&self, content: &str) -> Vec<String>;
}

/// How to interpret a document body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ContentFormat {
    /// Decide per document: markup when the first non-blank character is `<`.
    #[default]
    Auto,
    /// HTML.
    Markup,
    /// Pre-extracted plain text.
    #[value(name = "text")]
    PlainText,
}

impl ContentFormat {
    /// Resolve `Auto` against the content; other formats are returned as is.
    ///
    /// # Examples
    /// ```
    /// use eurlex_labeler::extract::ContentFormat;
    ///
    /// assert_eq!(ContentFormat::Auto.resolve("  <html>"), ContentFormat::Markup);
    /// assert_eq!(ContentFormat::Auto.resolve("Article 1"), ContentFormat::PlainText);
    /// assert_eq!(ContentFormat::PlainText.resolve("<p>"), ContentFormat::PlainText);
    /// ```
    #[must_use]
    pub fn resolve(self, content: &str) -> Self {
        match self {
            Self::Auto if content.trim_start().starts_with('<') => Self::Markup,
            Self::Auto => Self::PlainText,
            other => other,
        }
    }
}

/// Extract candidate lines using the adapter for `format`.
#[must_use]
pub fn extract_lines(content: &str, format: ContentFormat) -> Vec<String> {
    match format.resolve(content) {
        ContentFormat::Markup => MarkupExtractor.extract(content),
        _ => PlainTextExtractor.extract(content),
    }
}
