//! Staged report writes
//!
//! Each report is encoded into a temporary file created in its destination
//! directory. Nothing is renamed into place until both reports have been
//! fully staged, so a failure while encoding leaves the destinations as they
//! were. If the second rename fails, the first destination is put back the
//! way it was: restored from a copy of its previous content, or removed when
//! it did not exist. Temporary files are removed on drop when a run aborts.

use crate::encoding::{encode_csv, DEFAULT_DELIMITER};
use crate::error::{Result, WriterError};
use arrow::array::RecordBatch;
use hirestats_core::Reports;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Outcome of one persisted report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub path: PathBuf,
    pub row_count: usize,
    pub bytes: u64,
}

/// Outcome of persisting both reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub quarterly: WriteResult,
    pub above_average: WriteResult,
}

/// Destination for the two report tables
pub trait ReportSink {
    /// Persist both reports, or neither.
    fn write_reports(&self, reports: &Reports) -> Result<WriteSummary>;
}

/// Writes both reports as delimited files with a header line
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    quarterly_path: PathBuf,
    above_average_path: PathBuf,
    delimiter: u8,
    overwrite: bool,
}

impl CsvDirSink {
    pub fn new(quarterly_path: impl Into<PathBuf>, above_average_path: impl Into<PathBuf>) -> Self {
        Self {
            quarterly_path: quarterly_path.into(),
            above_average_path: above_average_path.into(),
            delimiter: DEFAULT_DELIMITER,
            overwrite: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// When false, an existing destination file is an error
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    fn check_destination(&self, path: &Path) -> Result<()> {
        let dir = parent_dir(path);
        if !dir.is_dir() {
            return Err(WriterError::invalid_config(
                path,
                format!("directory '{}' does not exist", dir.display()),
            ));
        }
        if !path.exists() {
            return Ok(());
        }
        if !path.is_file() {
            return Err(WriterError::invalid_config(
                path,
                "destination exists and is not a regular file",
            ));
        }
        if !self.overwrite {
            return Err(WriterError::invalid_config(
                path,
                "file already exists and overwrite is disabled",
            ));
        }
        Ok(())
    }

    /// Copy an existing destination aside so a failed commit can restore it.
    fn preserve(&self, path: &Path) -> Result<Option<NamedTempFile>> {
        if !path.is_file() {
            return Ok(None);
        }
        let backup = NamedTempFile::new_in(parent_dir(path))
            .map_err(|e| WriterError::write_failure(path, format!("failed to back up: {}", e)))?;
        std::fs::copy(path, backup.path())
            .map_err(|e| WriterError::write_failure(path, format!("failed to back up: {}", e)))?;
        Ok(Some(backup))
    }

    fn stage(&self, path: &Path, batch: &RecordBatch) -> Result<Staged> {
        let mut file = NamedTempFile::new_in(parent_dir(path))
            .map_err(|e| WriterError::write_failure(path, format!("failed to stage: {}", e)))?;

        let mut writer = encode_csv(batch, self.delimiter, BufWriter::new(file.as_file_mut()))
            .map_err(|e| WriterError::write_failure(path, format!("failed to encode: {}", e)))?;
        writer
            .flush()
            .map_err(|e| WriterError::write_failure(path, format!("failed to flush: {}", e)))?;
        drop(writer);

        let bytes = file
            .as_file()
            .metadata()
            .map_err(|e| WriterError::write_failure(path, e.to_string()))?
            .len();

        debug!(
            path = %path.display(),
            staged = %file.path().display(),
            rows = batch.num_rows(),
            bytes,
            "Staged report"
        );

        Ok(Staged {
            file,
            result: WriteResult {
                path: path.to_path_buf(),
                row_count: batch.num_rows(),
                bytes,
            },
        })
    }

    fn commit(&self, staged: Staged) -> Result<WriteResult> {
        let Staged { file, result } = staged;
        let persisted = if self.overwrite {
            file.persist(&result.path)
        } else {
            file.persist_noclobber(&result.path)
        };
        persisted.map_err(|e| {
            WriterError::write_failure(&result.path, format!("failed to commit: {}", e.error))
        })?;

        info!(
            path = %result.path.display(),
            rows = result.row_count,
            bytes = result.bytes,
            "Wrote report"
        );
        Ok(result)
    }
}

impl ReportSink for CsvDirSink {
    fn write_reports(&self, reports: &Reports) -> Result<WriteSummary> {
        if self.quarterly_path == self.above_average_path {
            return Err(WriterError::invalid_config(
                &self.quarterly_path,
                "both reports resolve to the same file",
            ));
        }
        self.check_destination(&self.quarterly_path)?;
        self.check_destination(&self.above_average_path)?;

        let quarterly = reports
            .quarterly
            .to_record_batch()
            .map_err(|e| WriterError::write_failure(&self.quarterly_path, e.to_string()))?;
        let above_average = reports
            .above_average
            .to_record_batch()
            .map_err(|e| WriterError::write_failure(&self.above_average_path, e.to_string()))?;

        let quarterly = self.stage(&self.quarterly_path, &quarterly)?;
        let above_average = self.stage(&self.above_average_path, &above_average)?;

        let previous = self.preserve(&self.quarterly_path)?;
        let quarterly = self.commit(quarterly)?;
        let above_average = match self.commit(above_average) {
            Ok(result) => result,
            Err(err) => {
                roll_back(&quarterly.path, previous);
                return Err(err);
            }
        };

        Ok(WriteSummary {
            quarterly,
            above_average,
        })
    }
}

/// Put `path` back to its content before the commit, or remove it.
fn roll_back(path: &Path, previous: Option<NamedTempFile>) {
    let restored = match previous {
        Some(backup) => backup.persist(path).map(drop).map_err(|e| e.error),
        None => std::fs::remove_file(path),
    };
    match restored {
        Ok(()) => info!(path = %path.display(), "Rolled back report after failed commit"),
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "Failed to roll back report after failed commit"
        ),
    }
}

struct Staged {
    file: NamedTempFile,
    result: WriteResult,
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
