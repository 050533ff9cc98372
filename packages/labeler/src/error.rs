//! Error types for the labeler.
//!
//! Uses the dual-error pattern: `LabelerError` for library consumers with
//! detailed error context, wrapping `RulesError` from the rules crate.

use std::path::PathBuf;

use eurlex_rules::RulesError;
use thiserror::Error;

/// Main error type for the labeler library.
#[derive(Debug, Error)]
pub enum LabelerError {
    /// The training file is already present; nothing is overwritten.
    #[error("A training file already exists at {}", .0.display())]
    OutputExists(PathBuf),

    /// Input directory missing or unreadable.
    #[error("Invalid input directory {}: {reason}", .path.display())]
    InputDirectory { path: PathBuf, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule configuration or record error.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// Content is not valid base64.
    #[error("Malformed content encoding: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),

    /// Decoded content is not UTF-8 text.
    #[error("Decoded content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A training file row does not have the expected shape.
    #[error("Malformed training row {line}: {reason}")]
    MalformedTrainingRow { line: usize, reason: String },

    /// Worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for labeler operations.
pub type Result<T> = std::result::Result<T, LabelerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_exists_display() {
        let err = LabelerError::OutputExists(PathBuf::from("out/train_data.tsv"));
        assert_eq!(
            err.to_string(),
            "A training file already exists at out/train_data.tsv"
        );
    }

    #[test]
    fn test_rules_error_is_transparent() {
        let err = LabelerError::from(RulesError::NonTerminalDecision);
        assert_eq!(err.to_string(), "Cannot assign an unvalidated decision");
    }

    #[test]
    fn test_malformed_row_display() {
        let err = LabelerError::MalformedTrainingRow {
            line: 3,
            reason: "expected 4 fields, found 2".to_string(),
        };
        assert!(err.to_string().contains("row 3"));
    }
}
