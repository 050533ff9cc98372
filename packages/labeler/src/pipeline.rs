//! Per-record and per-file labeling pipeline.
//!
//! A record is classified on its metadata first; only documents that reach a
//! terminal decision are cleaned (extract, segment, trim annexes) and
//! encoded, since unvalidated documents never produce a training row.

use std::path::{Path, PathBuf};

use eurlex_rules::{DocumentModel, RawRecord, RuleEngine, RuleStep};

use crate::encoding::{Label, TrainingRecord};
use crate::error::Result;
use crate::extract::{extract_lines, ContentFormat};
use crate::splitting::clean_document;

/// What happened to one input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// No content, or not exported from EUR-Lex.
    Ineligible,
    /// No rule fired.
    Unvalidated,
    /// A rule fired and a training row was produced.
    Labeled {
        record: TrainingRecord,
        step: RuleStep,
    },
}

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,

    /// The training row of the first eligible record with a terminal decision.
    pub record: Option<TrainingRecord>,

    /// The cascade step that labeled `record`.
    pub step: Option<RuleStep>,

    /// Records parsed before the file produced its row (or all of them).
    pub records_read: usize,

    /// Lines that were not valid JSON records.
    pub malformed: usize,

    pub ineligible: usize,

    pub unvalidated: usize,
}

impl FileOutcome {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            record: None,
            step: None,
            records_read: 0,
            malformed: 0,
            ineligible: 0,
            unvalidated: 0,
        }
    }
}

/// Labels records with a shared, read-only rule engine.
#[derive(Debug)]
pub struct LabelPipeline {
    engine: RuleEngine,
    format: ContentFormat,
}

impl LabelPipeline {
    #[must_use]
    pub fn new(engine: RuleEngine, format: ContentFormat) -> Self {
        Self { engine, format }
    }

    #[must_use]
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    #[must_use]
    pub fn format(&self) -> ContentFormat {
        self.format
    }

    /// Run one record through classification, cleaning and encoding.
    pub fn label_record(&self, record: RawRecord) -> Result<RecordOutcome> {
        if !record.is_eligible() {
            return Ok(RecordOutcome::Ineligible);
        }

        let mut document = DocumentModel::from(record);
        let verdict = self.engine.apply(&mut document)?;
        let Some(step) = verdict.step else {
            tracing::trace!(celex = %document.celex_id, "No rule fired");
            return Ok(RecordOutcome::Unvalidated);
        };

        let label = Label::try_from(document.decision())?;
        let text = clean_document(extract_lines(&document.content, self.format)).text();
        tracing::debug!(
            celex = %document.celex_id,
            step = %step,
            label = label.name(),
            chars = text.chars().count(),
            "Labeled document"
        );

        let record = TrainingRecord::new(&text, label, &document.celex_id);
        if record.celex_id != document.celex_id {
            tracing::warn!(
                celex = ?document.celex_id,
                sanitized = %record.celex_id,
                "CELEX id contains control characters, replaced with spaces"
            );
        }

        Ok(RecordOutcome::Labeled { record, step })
    }

    /// Process one newline-delimited JSON file.
    ///
    /// Stops at the first record that yields a training row. Malformed lines
    /// are logged and skipped; only failing to read the file is an error.
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let bytes = std::fs::read(path)?;
        let mut outcome = FileOutcome::new(path);

        for (index, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
            let line_no = index + 1;
            let Ok(line) = std::str::from_utf8(raw_line) else {
                tracing::warn!(file = %path.display(), line = line_no, "Skipping line that is not valid UTF-8");
                outcome.malformed += 1;
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }

            let record = match RawRecord::from_json_line(line) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(file = %path.display(), line = line_no, error = %e, "Skipping malformed record");
                    outcome.malformed += 1;
                    continue;
                }
            };
            outcome.records_read += 1;

            match self.label_record(record)? {
                RecordOutcome::Ineligible => outcome.ineligible += 1,
                RecordOutcome::Unvalidated => outcome.unvalidated += 1,
                RecordOutcome::Labeled { record, step } => {
                    outcome.record = Some(record);
                    outcome.step = Some(step);
                    break;
                }
            }
        }

        Ok(outcome)
    }
}

impl Default for LabelPipeline {
    fn default() -> Self {
        Self::new(RuleEngine::default(), ContentFormat::default())
    }
}
