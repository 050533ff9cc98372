//! Raw EUR-Lex export records.
//!
//! One record is one line of a newline-delimited JSON export. Every field is
//! optional and several fields come either as a single string or as a list
//! of strings, depending on the exporter version.

use serde::Deserialize;

use crate::error::Result;

/// Substring the `website` field must contain for a record to be labeled.
pub const ELIGIBLE_WEBSITE_MARKER: &str = "eurlex";

/// A JSON value that is either one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// The single value, or the first element of the list.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value.as_str()),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }

    /// All values, in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// One exported document, exactly as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    /// Document body: HTML or pre-extracted plain text.
    pub content: Option<OneOrMany>,

    /// CELEX identifier.
    pub celex: Option<OneOrMany>,

    pub misc_author: Option<OneOrMany>,

    pub misc_department_responsible: Option<OneOrMany>,

    /// Classification type per entry, parallel to `classifications_code`.
    pub classifications_type: Option<Vec<String>>,

    pub classifications_code: Option<Vec<String>>,

    /// Human-readable label per entry, parallel to `classifications_type`.
    pub classifications_label: Option<Vec<String>>,

    /// Source website of the export.
    pub website: Option<String>,
}

impl RawRecord {
    /// Parse one JSON line.
    ///
    /// # Examples
    /// ```
    /// use eurlex_rules::RawRecord;
    ///
    /// let record = RawRecord::from_json_line(r#"{"celex": ["32014L0065"], "website": "eurlex"}"#).unwrap();
    /// assert_eq!(record.celex_id(), "32014L0065");
    /// assert!(RawRecord::from_json_line("{not json").is_err());
    /// ```
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Document body, normalized to the first element when exported as a list.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_ref().and_then(OneOrMany::first)
    }

    /// CELEX identifier, or an empty string when the export has none.
    #[must_use]
    pub fn celex_id(&self) -> &str {
        self.celex
            .as_ref()
            .and_then(OneOrMany::first)
            .unwrap_or_default()
    }

    /// Whether this record takes part in labeling: it must carry content and
    /// come from the EUR-Lex website.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.content().is_some()
            && self
                .website
                .as_deref()
                .is_some_and(|site| site.contains(ELIGIBLE_WEBSITE_MARKER))
    }
}
