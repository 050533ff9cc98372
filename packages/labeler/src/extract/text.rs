//! Plain-text adapter.

use super::LineExtractor;

/// Splits pre-extracted text into lines.
///
/// Leading and trailing newlines are stripped before splitting. A trailing
/// carriage return is removed from each line, and blank lines are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl LineExtractor for PlainTextExtractor {
    fn extract(&self, content: &str) -> Vec<String> {
        content
            .trim_matches('\n')
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_and_drop_empty() {
        let text = "\n\nArticle 1\n\nSome text.\n   \nArticle 2\nMore text.\n\n";
        assert_eq!(
            PlainTextExtractor.extract(text),
            vec!["Article 1", "Some text.", "Article 2", "More text."]
        );
    }

    #[test]
    fn test_crlf_lines() {
        let text = "Article 1\r\nBody.\r\n";
        assert_eq!(PlainTextExtractor.extract(text), vec!["Article 1", "Body."]);
    }

    #[test]
    fn test_line_content_kept_verbatim() {
        let text = "  indented line  \nnext";
        assert_eq!(
            PlainTextExtractor.extract(text),
            vec!["  indented line  ", "next"]
        );
    }

    #[test]
    fn test_empty() {
        assert!(PlainTextExtractor.extract("").is_empty());
        assert!(PlainTextExtractor.extract("\n\n\n").is_empty());
    }
}
