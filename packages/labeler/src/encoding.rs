//! Training record encoding.
//!
//! A training record is one TSV row: the base64 of the cleaned document
//! text, the label name, the label id and the CELEX identifier.

use std::fmt;

use base64::{engine::general_purpose, Engine};
use eurlex_rules::{Decision, RulesError};

use crate::config::{FIELD_SEPARATOR, TRAINING_FIELDS};
use crate::error::{LabelerError, Result};

/// Encode document text for the training file.
#[must_use]
pub fn encode_content(text: &str) -> String {
    general_purpose::STANDARD.encode(text.as_bytes())
}

/// Decode text produced by [`encode_content`].
///
/// # Examples
/// ```
/// use eurlex_labeler::encoding::{decode_content, encode_content};
///
/// let text = "Article 1 Règlement (UE) n° 575/2013";
/// assert_eq!(decode_content(&encode_content(text)).unwrap(), text);
/// assert!(decode_content("not base64!").is_err());
/// ```
pub fn decode_content(encoded: &str) -> Result<String> {
    let bytes = general_purpose::STANDARD.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}

/// Terminal label of a training record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Accepted,
    Rejected,
}

impl Label {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Accepted => "1",
            Self::Rejected => "0",
        }
    }

    /// Parse the name and id columns of a training row. Both must agree.
    #[must_use]
    pub fn from_columns(name: &str, id: &str) -> Option<Self> {
        [Self::Accepted, Self::Rejected]
            .into_iter()
            .find(|label| label.name() == name && label.id() == id)
    }
}

impl TryFrom<Decision> for Label {
    type Error = RulesError;

    fn try_from(decision: Decision) -> std::result::Result<Self, Self::Error> {
        match decision {
            Decision::Accepted => Ok(Self::Accepted),
            Decision::Rejected => Ok(Self::Rejected),
            Decision::Unvalidated => Err(RulesError::NonTerminalDecision),
        }
    }
}

impl From<Label> for Decision {
    fn from(label: Label) -> Self {
        match label {
            Label::Accepted => Decision::Accepted,
            Label::Rejected => Decision::Rejected,
        }
    }
}

/// Make a value safe for a single TSV column: control characters and
/// non-space whitespace (tabs, line breaks) become spaces, and the result is
/// trimmed.
#[must_use]
pub fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() || (c.is_whitespace() && c != ' ') { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// One row of the training file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRecord {
    pub encoded_content: String,
    pub label: Label,
    pub celex_id: String,
}

impl TrainingRecord {
    /// Build a record from cleaned document text. The CELEX id is passed
    /// through [`sanitize_field`] so the row always has four columns.
    #[must_use]
    pub fn new(text: &str, label: Label, celex_id: &str) -> Self {
        Self {
            encoded_content: encode_content(text),
            label,
            celex_id: sanitize_field(celex_id),
        }
    }

    /// Decode the content column.
    pub fn decoded_content(&self) -> Result<String> {
        decode_content(&self.encoded_content)
    }

    /// Parse one row of a training file. `line` is 1-based and only used
    /// for error reporting.
    pub fn parse_line(line: usize, row: &str) -> Result<Self> {
        let row = row.strip_suffix('\r').unwrap_or(row);
        let fields: Vec<&str> = row.split(FIELD_SEPARATOR).collect();
        if fields.len() != TRAINING_FIELDS {
            return Err(LabelerError::MalformedTrainingRow {
                line,
                reason: format!("expected {TRAINING_FIELDS} fields, found {}", fields.len()),
            });
        }

        let label = Label::from_columns(fields[1], fields[2]).ok_or_else(|| {
            LabelerError::MalformedTrainingRow {
                line,
                reason: format!("unknown label '{}' with id '{}'", fields[1], fields[2]),
            }
        })?;

        Ok(Self {
            encoded_content: fields[0].to_string(),
            label,
            celex_id: fields[3].to_string(),
        })
    }
}

impl fmt::Display for TrainingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.encoded_content,
            self.label.name(),
            self.label.id(),
            self.celex_id
        )
    }
}
