//! Article segmentation.
//!
//! Lines are grouped into articles by a two-state accumulator: a heading line
//! closes the article in progress (if any) and opens a new one, every other
//! line extends the current article.

use super::types::Article;
use crate::grammar::is_heading;

/// Streaming article segmenter.
///
/// # Example
///
/// ```
/// use eurlex_labeler::splitting::ArticleSegmenter;
///
/// let mut segmenter = ArticleSegmenter::new();
/// for line in ["Article 1", "Some text.", "Article 2", "More text."] {
///     segmenter.push_line(line);
/// }
/// let articles = segmenter.finish();
///
/// assert_eq!(articles.len(), 2);
/// assert_eq!(articles[1].lines, vec!["Article 2", "More text."]);
/// ```
#[derive(Debug, Default)]
pub struct ArticleSegmenter {
    articles: Vec<Article>,
    current: Vec<String>,
}

impl ArticleSegmenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line of the document.
    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if is_heading(&line) {
            self.close_current();
        }
        self.current.push(line);
    }

    /// Close the article in progress and return all articles in order.
    #[must_use]
    pub fn finish(mut self) -> Vec<Article> {
        self.close_current();
        self.articles
    }

    fn close_current(&mut self) {
        if !self.current.is_empty() {
            let lines = std::mem::take(&mut self.current);
            self.articles.push(Article::new(lines));
        }
    }
}

/// Segment a whole line sequence.
#[must_use]
pub fn segment<I, S>(lines: I) -> Vec<Article>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut segmenter = ArticleSegmenter::new();
    for line in lines {
        segmenter.push_line(line);
    }
    segmenter.finish()
}
