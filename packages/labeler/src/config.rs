//! Configuration constants and validation functions for the labeler.

use std::path::{Path, PathBuf};

use crate::error::{LabelerError, Result};

/// File name of the training artifact inside the output directory.
pub const TRAINING_FILE_NAME: &str = "train_data.tsv";

/// Extension of the export files read from the input directory.
pub const INPUT_EXTENSION: &str = "jsonl";

/// Field separator of the training file.
pub const FIELD_SEPARATOR: char = '\t';

/// Number of fields in a training file row.
pub const TRAINING_FIELDS: usize = 4;

/// Default number of batch workers: one per available processing unit.
#[must_use]
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Resolve the training file path and make sure it does not exist yet.
///
/// # Arguments
/// * `output_dir` - Directory the training file will be written to
///
/// # Returns
/// * `Ok(path)` of the training file to create
/// * `Err(LabelerError::OutputExists)` if the file is already there
///
/// # Examples
/// ```
/// use eurlex_labeler::config::training_output_path;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = training_output_path(dir.path()).unwrap();
/// assert!(path.ends_with("train_data.tsv"));
///
/// std::fs::write(&path, "").unwrap();
/// assert!(training_output_path(dir.path()).is_err());
/// ```
pub fn training_output_path(output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(TRAINING_FILE_NAME);
    if path.exists() {
        return Err(LabelerError::OutputExists(path));
    }
    Ok(path)
}

/// Validate that the input path is an existing directory.
pub fn validate_input_dir(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(LabelerError::InputDirectory {
            path: input_dir.to_path_buf(),
            reason: "does not exist".to_string(),
        });
    }
    if !input_dir.is_dir() {
        return Err(LabelerError::InputDirectory {
            path: input_dir.to_path_buf(),
            reason: "is not a directory".to_string(),
        });
    }
    Ok(())
}

/// Whether a path looks like an export file (`*.jsonl`).
#[must_use]
pub fn is_input_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == INPUT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_training_output_path_fresh() {
        let dir = tempdir().unwrap();
        let path = training_output_path(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(TRAINING_FILE_NAME));
    }

    #[test]
    fn test_training_output_path_existing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(TRAINING_FILE_NAME), "old").unwrap();

        let err = training_output_path(dir.path()).unwrap_err();
        assert!(matches!(err, LabelerError::OutputExists(_)));
    }

    #[test]
    fn test_validate_input_dir() {
        let dir = tempdir().unwrap();
        assert!(validate_input_dir(dir.path()).is_ok());

        let file = dir.path().join("export.jsonl");
        std::fs::write(&file, "{}").unwrap();
        assert!(validate_input_dir(&file).is_err());
        assert!(validate_input_dir(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_is_input_file() {
        let dir = tempdir().unwrap();
        let jsonl = dir.path().join("a.jsonl");
        let json = dir.path().join("b.json");
        std::fs::write(&jsonl, "").unwrap();
        std::fs::write(&json, "").unwrap();

        assert!(is_input_file(&jsonl));
        assert!(!is_input_file(&json));
        assert!(!is_input_file(dir.path()));
    }

    #[test]
    fn test_default_jobs_positive() {
        assert!(default_jobs() >= 1);
    }
}
