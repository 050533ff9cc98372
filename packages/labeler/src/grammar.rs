//! Structural heading recognition.
//!
//! A heading is a line that consists of nothing but a structural keyword
//! (Part, Title, Chapter, Section, Sub-Section, Article, ANNEX) and an
//! optional ordinal: digits and dots, an English number word from ONE to
//! TWENTY, or a Roman numeral from I to XX. The ordinal may follow the
//! keyword directly (`ANNEXI`), since markup cleaning can remove the line
//! break between them. Matching is case-insensitive and ignores surrounding
//! whitespace.

use regex::Regex;
use std::sync::LazyLock;

/// Ordinal token shared by the general and the annex-only grammar.
const ORDINAL: &str = concat!(
    r"\d+(?:\.\d+)*\.?",
    r"|ONE|TWO|THREE|FOUR|FIVE|SIX|SEVEN|EIGHT|NINE|TEN",
    r"|ELEVEN|TWELVE|THIRTEEN|FOURTEEN|FIFTEEN|SIXTEEN|SEVENTEEN|EIGHTEEN|NINETEEN|TWENTY",
    r"|XX|X?(?:IX|IV|VI{0,3}|I{1,3})|X",
);

const KEYWORDS: &str = r"Part|Title|Chapter|Section|Sub-Section|Article|ANNEX";

fn heading_pattern(keywords: &str) -> String {
    format!(r"(?i)^(?P<keyword>{keywords})(?:\s*(?P<ordinal>{ORDINAL}))?\s*$")
}

/// Any structural heading.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&heading_pattern(KEYWORDS)).expect("valid regex"));

/// ANNEX headings only.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ANNEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&heading_pattern("ANNEX")).expect("valid regex"));

/// Structural level named by a heading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    Part,
    Title,
    Chapter,
    Section,
    SubSection,
    Article,
    Annex,
}

impl HeadingKind {
    /// Parse a keyword, ignoring case.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "part" => Some(Self::Part),
            "title" => Some(Self::Title),
            "chapter" => Some(Self::Chapter),
            "section" => Some(Self::Section),
            "sub-section" => Some(Self::SubSection),
            "article" => Some(Self::Article),
            "annex" => Some(Self::Annex),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Part => "Part",
            Self::Title => "Title",
            Self::Chapter => "Chapter",
            Self::Section => "Section",
            Self::SubSection => "Sub-Section",
            Self::Article => "Article",
            Self::Annex => "ANNEX",
        }
    }
}

/// A recognized heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub kind: HeadingKind,

    /// Ordinal as written in the source (e.g., "IV", "3.1", "TWO").
    pub ordinal: Option<String>,
}

/// Parse a heading line.
///
/// # Examples
/// ```
/// use eurlex_labeler::grammar::{parse_heading, HeadingKind};
///
/// let heading = parse_heading("  Chapter IV ").unwrap();
/// assert_eq!(heading.kind, HeadingKind::Chapter);
/// assert_eq!(heading.ordinal.as_deref(), Some("IV"));
///
/// assert!(parse_heading("Article 3 shall apply from 1 January").is_none());
/// ```
#[must_use]
pub fn parse_heading(line: &str) -> Option<Heading> {
    let captures = HEADING_PATTERN.captures(line.trim())?;
    let kind = HeadingKind::from_keyword(captures.name("keyword")?.as_str())?;
    let ordinal = captures.name("ordinal").map(|m| m.as_str().to_string());
    Some(Heading { kind, ordinal })
}

/// Whether the line is a structural heading of any kind.
#[must_use]
pub fn is_heading(line: &str) -> bool {
    HEADING_PATTERN.is_match(line.trim())
}

/// Whether the line is an ANNEX heading.
#[must_use]
pub fn is_annex_heading(line: &str) -> bool {
    ANNEX_PATTERN.is_match(line.trim())
}
