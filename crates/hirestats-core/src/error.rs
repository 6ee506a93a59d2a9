//! Error types for the hiring report pipeline

use thiserror::Error;

/// Fatal conditions raised while building the reports.
///
/// Every variant aborts the run; the pipeline never produces a partial report.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An input row does not conform to its table's fixed schema
    /// (wrong arity, untypeable field, or null in a required column).
    #[error("schema violation in '{table}': {reason}")]
    SchemaViolation {
        /// Logical table name (departments, jobs, hired_employees)
        table: &'static str,
        /// Reader diagnostics, including the offending line where known
        reason: String,
    },

    /// A hire's timestamp could not be parsed under the configured format.
    #[error("cannot parse hire timestamp {value:?} for employee {employee_id}: {reason}")]
    TemporalParseError {
        employee_id: i32,
        /// Raw field value, `None` when the field was empty
        value: Option<String>,
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn schema(table: &'static str, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            table,
            reason: reason.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
