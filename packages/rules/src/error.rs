//! Error types for the rule cascade.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rule configuration and document handling.
#[derive(Debug, Error)]
pub enum RulesError {
    /// Rules file could not be read.
    #[error("Failed to read rules file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rules file is not valid YAML for a `RuleConfig`.
    #[error("Failed to parse rules configuration: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// Rules configuration parsed but violates a constraint.
    #[error("Invalid rules configuration: {0}")]
    InvalidConfig(String),

    /// A JSON line could not be read as a raw record.
    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    /// A decision was assigned to a document that already has one.
    #[error("Document '{celex_id}' already has a decision")]
    DecisionAlreadyAssigned { celex_id: String },

    /// Only accepted or rejected may be assigned.
    #[error("Cannot assign an unvalidated decision")]
    NonTerminalDecision,
}

/// Result type alias for rule operations.
pub type Result<T> = std::result::Result<T, RulesError>;
