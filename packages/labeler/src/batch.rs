//! Batch labeling of an export directory.
//!
//! Every `*.jsonl` file is an independent task on a fixed-size worker pool.
//! Workers only return values; the coordinator writes the training file once,
//! after every task has finished.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use eurlex_rules::RuleStep;
use rayon::prelude::*;

use crate::config::{is_input_file, training_output_path, validate_input_dir, TRAINING_FILE_NAME};
use crate::encoding::{Label, TrainingRecord};
use crate::error::{LabelerError, Result};
use crate::pipeline::{FileOutcome, LabelPipeline};

/// Result of one file task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResult {
    Processed(FileOutcome),
    /// The file could not be read, or processing it panicked.
    Failed { path: PathBuf, reason: String },
}

impl FileResult {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Processed(outcome) => &outcome.path,
            Self::Failed { path, .. } => path,
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&TrainingRecord> {
        match self {
            Self::Processed(outcome) => outcome.record.as_ref(),
            Self::Failed { .. } => None,
        }
    }
}

/// Totals of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub output_path: PathBuf,
    pub files: usize,
    pub failed_files: usize,
    pub labeled: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub records_read: usize,
    pub malformed: usize,
    pub ineligible: usize,
    pub unvalidated: usize,

    /// How often each cascade step produced a training row.
    pub by_step: BTreeMap<RuleStep, usize>,
}

impl BatchSummary {
    fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            ..Self::default()
        }
    }

    fn add(&mut self, result: &FileResult) {
        self.files += 1;
        let outcome = match result {
            FileResult::Processed(outcome) => outcome,
            FileResult::Failed { .. } => {
                self.failed_files += 1;
                return;
            }
        };

        self.records_read += outcome.records_read;
        self.malformed += outcome.malformed;
        self.ineligible += outcome.ineligible;
        self.unvalidated += outcome.unvalidated;

        if let Some(record) = &outcome.record {
            self.labeled += 1;
            match record.label {
                Label::Accepted => self.accepted += 1,
                Label::Rejected => self.rejected += 1,
            }
        }
        if let Some(step) = outcome.step {
            *self.by_step.entry(step).or_default() += 1;
        }
    }
}

/// List the export files directly inside `input_dir`, sorted by name.
pub fn list_input_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    validate_input_dir(input_dir)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if is_input_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Label every export file in `input_dir` and write
/// `<output_dir>/train_data.tsv`.
///
/// Fails with [`LabelerError::OutputExists`] before any input is read when
/// the training file is already there. A file that cannot be read, or whose
/// processing panics, is logged and contributes no row; the batch goes on.
///
/// `on_file` is called from worker threads as each file finishes.
///
/// # Arguments
/// * `pipeline` - Shared, read-only labeling pipeline
/// * `input_dir` - Directory with `*.jsonl` exports
/// * `output_dir` - Directory for the training file, created if missing
/// * `jobs` - Number of worker threads
/// * `on_file` - Progress callback
pub fn run_batch<F>(
    pipeline: &LabelPipeline,
    input_dir: &Path,
    output_dir: &Path,
    jobs: usize,
    on_file: F,
) -> Result<BatchSummary>
where
    F: Fn(&FileResult) + Sync,
{
    let output_path = training_output_path(output_dir)?;
    let files = list_input_files(input_dir)?;
    fs::create_dir_all(output_dir)?;

    tracing::info!(
        files = files.len(),
        jobs,
        input = %input_dir.display(),
        "Starting batch"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()?;

    let results: Vec<FileResult> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let result = process_isolated(pipeline, path);
                on_file(&result);
                result
            })
            .collect()
    });

    let mut summary = BatchSummary::new(output_path);
    for result in &results {
        summary.add(result);
    }

    let records: Vec<&TrainingRecord> = results.iter().filter_map(FileResult::record).collect();
    write_training_file(&summary.output_path, &records)?;

    tracing::info!(
        labeled = summary.labeled,
        failed = summary.failed_files,
        output = %summary.output_path.display(),
        "Batch complete"
    );
    Ok(summary)
}

/// Run one file task, turning errors and panics into a failed result.
fn process_isolated(pipeline: &LabelPipeline, path: &Path) -> FileResult {
    match panic::catch_unwind(AssertUnwindSafe(|| pipeline.process_file(path))) {
        Ok(Ok(outcome)) => FileResult::Processed(outcome),
        Ok(Err(e)) => {
            tracing::warn!(file = %path.display(), error = %e, "Failed to process file");
            FileResult::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
        Err(payload) => {
            let reason = panic_message(&*payload);
            tracing::error!(file = %path.display(), reason = %reason, "File task panicked");
            FileResult::Failed {
                path: path.to_path_buf(),
                reason: format!("panicked: {reason}"),
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Write rows to the training file through a synced temporary file.
fn write_training_file(output_path: &Path, records: &[&TrainingRecord]) -> Result<()> {
    write_atomically(output_path, |file| {
        for record in records {
            writeln!(file, "{record}")?;
        }
        Ok(())
    })
}

/// Fill a temporary file next to `output_path`, sync it and rename it into
/// place. The temporary file is removed if any step before the rename fails.
fn write_atomically<F>(output_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = output_path.parent().unwrap_or(Path::new("."));
    let temp_file = dir.join(format!(".{TRAINING_FILE_NAME}.tmp"));

    let filled = File::create(&temp_file).map_err(LabelerError::from).and_then(|mut file| {
        write(&mut file)?;
        file.sync_all()?;
        Ok(())
    });
    if let Err(e) = filled {
        if let Err(cleanup) = fs::remove_file(&temp_file) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(file = %temp_file.display(), error = %cleanup, "Failed to remove temporary file");
            }
        }
        return Err(e);
    }

    // Never replace a file that appeared while the batch was running.
    if output_path.exists() {
        fs::remove_file(&temp_file)?;
        return Err(LabelerError::OutputExists(output_path.to_path_buf()));
    }

    fs::rename(&temp_file, output_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::decode_content;
    use crate::extract::ContentFormat;
    use eurlex_rules::{Criterion, Decision, DocumentModel, Rule, RuleEngine};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn export_line(celex: &str, department: &str) -> String {
        serde_json::json!({
            "celex": [celex],
            "website": "eurlex",
            "misc_department_responsible": [department],
            "content": [format!("<html><body><p>Article 1</p><p>{celex} text.</p></body></html>")],
        })
        .to_string()
    }

    fn write_export(dir: &Path, name: &str, lines: &[String]) {
        fs::write(dir.join(name), lines.join("\n")).unwrap();
    }

    #[test]
    fn test_batch_writes_one_row_per_labeled_file() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_export(input.path(), "b.jsonl", &[export_line("B", "FISMA")]);
        write_export(input.path(), "a.jsonl", &[export_line("A", "FISMA"), export_line("A2", "FISMA")]);
        write_export(input.path(), "c.jsonl", &[export_line("C", "AGRI")]);
        fs::write(input.path().join("notes.txt"), "ignored").unwrap();

        let seen = AtomicUsize::new(0);
        let summary = run_batch(&LabelPipeline::default(), input.path(), output.path(), 2, |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert_eq!(summary.files, 3);
        assert_eq!(summary.labeled, 2);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.unvalidated, 1);
        assert_eq!(summary.by_step.get(&RuleStep::Department), Some(&2));

        let written = fs::read_to_string(output.path().join(TRAINING_FILE_NAME)).unwrap();
        let rows: Vec<TrainingRecord> = written
            .lines()
            .enumerate()
            .map(|(i, line)| TrainingRecord::parse_line(i + 1, line).unwrap())
            .collect();
        let celex: Vec<&str> = rows.iter().map(|r| r.celex_id.as_str()).collect();
        assert_eq!(celex, vec!["A", "B"]);
        assert_eq!(decode_content(&rows[0].encoded_content).unwrap(), "Article 1 A text.");
        assert!(!output.path().join(format!(".{TRAINING_FILE_NAME}.tmp")).exists());
    }

    #[test]
    fn test_failed_write_removes_temporary_file() {
        let output = tempdir().unwrap();
        let target = output.path().join(TRAINING_FILE_NAME);
        let temp_file = output.path().join(format!(".{TRAINING_FILE_NAME}.tmp"));

        let err = write_atomically(&target, |file| {
            writeln!(file, "partial row")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        })
        .unwrap_err();

        assert!(matches!(err, LabelerError::Io(_)));
        assert!(!temp_file.exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_existing_output_fails_before_reading_input() {
        let output = tempdir().unwrap();
        let target = output.path().join(TRAINING_FILE_NAME);
        fs::write(&target, "previous run").unwrap();

        // The input directory does not even exist: the collision wins.
        let err = run_batch(
            &LabelPipeline::default(),
            Path::new("/nonexistent/input"),
            output.path(),
            1,
            |_| {},
        )
        .unwrap_err();

        assert!(matches!(err, LabelerError::OutputExists(_)));
        assert_eq!(fs::read_to_string(&target).unwrap(), "previous run");
    }

    #[test]
    fn test_missing_output_dir_is_created() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let nested = output.path().join("run").join("1");

        let summary = run_batch(&LabelPipeline::default(), input.path(), &nested, 1, |_| {}).unwrap();
        assert_eq!(summary.files, 0);
        assert_eq!(fs::read_to_string(nested.join(TRAINING_FILE_NAME)).unwrap(), "");
    }

    struct PanicsOn(&'static str);

    impl Criterion for PanicsOn {
        fn evaluate(&self, document: &DocumentModel) -> bool {
            if document.celex_id == self.0 {
                panic!("criterion failure for {}", self.0);
            }
            true
        }
    }

    #[test]
    fn test_panicking_file_does_not_abort_batch() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_export(input.path(), "1.jsonl", &[export_line("OK1", "X")]);
        write_export(input.path(), "2.jsonl", &[export_line("BOOM", "X")]);
        write_export(input.path(), "3.jsonl", &[export_line("OK3", "X")]);

        let engine = RuleEngine::from_rules(vec![Rule::new(
            RuleStep::Author,
            Decision::Accepted,
            PanicsOn("BOOM"),
        )]);
        let pipeline = LabelPipeline::new(engine, ContentFormat::Auto);

        let summary = run_batch(&pipeline, input.path(), output.path(), 3, |_| {}).unwrap();
        assert_eq!(summary.files, 3);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.labeled, 2);

        let written = fs::read_to_string(output.path().join(TRAINING_FILE_NAME)).unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn test_list_input_files_sorted() {
        let input = tempdir().unwrap();
        for name in ["z.jsonl", "a.jsonl", "m.json", "b.jsonl"] {
            fs::write(input.path().join(name), "").unwrap();
        }
        fs::create_dir(input.path().join("nested.jsonl")).unwrap();

        let names: Vec<String> = list_input_files(input.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl", "z.jsonl"]);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*payload), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*payload), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*payload), "unknown panic");
    }
}
