//! Report sink for hirestats
//!
//! Persists the quarterly and above-average reports as delimited files with
//! a header line. Both reports are staged before either is committed.

mod encoding;
mod error;
mod write;

pub use encoding::{encode_csv, DEFAULT_DELIMITER};
pub use error::{ErrorCode, Result, WriterError};
pub use write::{CsvDirSink, ReportSink, WriteResult, WriteSummary};
