//! EUR-Lex business rules - decide whether a document is relevant for FISMA.
//!
//! This crate turns one exported EUR-Lex record into a [`DocumentModel`] and
//! runs the prioritized rule cascade over it to decide whether the document
//! is accepted, rejected or left unvalidated.
//!
//! # Example
//!
//! ```
//! use eurlex_rules::{Decision, DocumentModel, RawRecord, RuleEngine};
//!
//! let record = RawRecord::from_json_line(
//!     r#"{"misc_department_responsible": ["FISMA"], "content": "Article 1", "website": "eurlex"}"#,
//! ).unwrap();
//! let document = DocumentModel::from(record);
//!
//! let engine = RuleEngine::default();
//! assert_eq!(engine.classify(&document).decision, Decision::Accepted);
//! ```
//!
//! # Architecture
//!
//! - [`record`]: wire format of the newline-delimited JSON export
//! - [`document`]: normalized document model and decisions
//! - [`config`]: accepted/rejected code sets, loadable from YAML
//! - [`engine`]: the rule cascade
//! - [`error`]: error types and Result alias

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod record;

pub use config::{CodeSet, MatchPolicy, RuleConfig, DEFAULT_EUROVOC_THRESHOLD};
pub use document::{Decision, DocumentModel, Taxonomy};
pub use engine::{Criterion, Rule, RuleEngine, RuleStep, Verdict};
pub use error::{Result, RulesError};
pub use record::{OneOrMany, RawRecord, ELIGIBLE_WEBSITE_MARKER};
