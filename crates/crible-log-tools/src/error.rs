//! Log scanning and query validation error types.

use thiserror::Error;

/// Errors raised while reading a log file backward.
///
/// Every variant is a server-side failure: callers surface it as a failed
/// request, never as an empty result.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("log file not found: {0}")]
    NotFound(String),

    #[error("not a regular file: {0}")]
    NotAFile(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scan task failed: {0}")]
    Task(String),
}

impl ScanError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

/// Rejections produced by the request validator. Always client faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing filename")]
    MissingFilename,

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    #[error("invalid limit. Limit must be between {min} and {max}")]
    LimitOutOfRange { min: usize, max: usize },
}

/// Rejections of a `QueryLimits` configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid query limits: {0}")]
pub struct LimitsError(pub String);

/// Convenience alias for scan results.
pub type LogResult<T> = Result<T, ScanError>;
