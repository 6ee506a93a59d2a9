//! Error types for the report writer crate

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E004: Destination missing or invalid
    E004InvalidConfig,
    /// E005: Write operation failed
    E005WriteFailure,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E004InvalidConfig => "E004",
            Self::E005WriteFailure => "E005",
        }
    }
}

/// Errors that can occur while persisting reports
#[derive(Debug, Error)]
pub enum WriterError {
    /// The destination cannot accept the report
    #[error("[{code}] Invalid destination '{}': {message}", .path.display())]
    InvalidConfig {
        code: &'static str,
        path: PathBuf,
        message: String,
    },

    /// Encoding, staging or committing a report failed
    #[error("[{code}] Write operation failed for '{}': {message}", .path.display())]
    WriteFailure {
        code: &'static str,
        path: PathBuf,
        message: String,
    },
}

impl WriterError {
    /// Create an invalid destination error with error code
    pub fn invalid_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            code: ErrorCode::E004InvalidConfig.as_str(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a write failure error with error code
    pub fn write_failure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::WriteFailure {
            code: ErrorCode::E005WriteFailure.as_str(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig { .. } => ErrorCode::E004InvalidConfig,
            Self::WriteFailure { .. } => ErrorCode::E005WriteFailure,
        }
    }
}

/// Result type alias for WriterError
pub type Result<T> = std::result::Result<T, WriterError>;
