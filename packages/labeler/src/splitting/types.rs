//! Types for article segmentation.

use crate::grammar::{parse_heading, Heading};

/// A logical article unit: a heading line (when the document has one) and
/// the lines that follow it up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Lines in document order. Never empty.
    pub lines: Vec<String>,
}

impl Article {
    /// Create an article from its lines.
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// The first line of the article.
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    /// The parsed heading, if the first line is one.
    ///
    /// Articles that precede the first heading of a document (title,
    /// preamble) have none.
    #[must_use]
    pub fn heading(&self) -> Option<Heading> {
        self.first_line().and_then(parse_heading)
    }

    /// Lines joined by newline.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Articles that survived annex trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanDocument {
    pub articles: Vec<Article>,
}

impl CleanDocument {
    #[must_use]
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Articles joined by a space, every whitespace run collapsed to one
    /// space, no leading or trailing whitespace.
    ///
    /// # Examples
    /// ```
    /// use eurlex_labeler::splitting::{Article, CleanDocument};
    ///
    /// let doc = CleanDocument::new(vec![
    ///     Article::new(vec!["Article 1".into(), "Some  text.".into()]),
    ///     Article::new(vec!["Article 2".into()]),
    /// ]);
    /// assert_eq!(doc.text(), "Article 1 Some text. Article 2");
    /// ```
    #[must_use]
    pub fn text(&self) -> String {
        let joined = self
            .articles
            .iter()
            .map(Article::text)
            .collect::<Vec<_>>()
            .join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
