//! EUR-Lex Labeler - Turn EUR-Lex exports into classifier training data.
//!
//! Each exported document is reduced to its article text (annexes removed),
//! classified by the FISMA rule cascade from [`eurlex_rules`], and written as
//! one base64-encoded TSV row when a rule accepts or rejects it.
//!
//! # Example
//!
//! ```
//! use eurlex_labeler::extract::{extract_lines, ContentFormat};
//! use eurlex_labeler::splitting::clean_document;
//!
//! let html = "<html><body><p>Article 1</p><p>Body.</p><p>ANNEX I</p><p>Table.</p></body></html>";
//! let document = clean_document(extract_lines(html, ContentFormat::Auto));
//! assert_eq!(document.text(), "Article 1 Body.");
//! ```
//!
//! # Architecture
//!
//! - [`grammar`]: Structural heading recognition
//! - [`extract`]: HTML and plain-text line extraction
//! - [`splitting`]: Article segmentation and annex trimming
//! - [`encoding`]: Training record encoding
//! - [`pipeline`]: Per-record and per-file labeling
//! - [`batch`]: Parallel labeling of an export directory
//! - [`config`]: Constants and path validation
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod pipeline;
pub mod splitting;

pub use batch::{run_batch, BatchSummary, FileResult};
pub use encoding::{decode_content, encode_content, Label, TrainingRecord};
pub use error::{LabelerError, Result};
pub use extract::ContentFormat;
pub use pipeline::{FileOutcome, LabelPipeline, RecordOutcome};
pub use splitting::{clean_document, Article, CleanDocument};
