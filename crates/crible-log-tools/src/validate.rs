//! Request validation: checks filename, filter, and limit before any I/O.
//!
//! Validation is pure: it never touches the filesystem or the network, so
//! both the watcher and the coordinator can run it up front.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crible_protocol::LogQuery;

use crate::error::ValidationError;
use crate::limits::QueryLimits;

static RE_FILTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// A query that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    /// Single path segment, safe to join under the log root.
    pub filename: String,
    /// `None` means every line matches.
    pub filter: Option<String>,
    /// `None` means the configured default applies.
    pub limit: Option<usize>,
}

impl ValidatedQuery {
    pub fn effective_limit(&self, limits: &QueryLimits) -> usize {
        self.limit.unwrap_or(limits.default_limit)
    }

    /// Path of the requested file under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.filename)
    }

    /// Rebuild the wire query, with the effective limit made explicit.
    pub fn to_log_query(&self, limits: &QueryLimits) -> LogQuery {
        LogQuery {
            filename: Some(self.filename.clone()),
            filter: self.filter.clone(),
            limit: Some(self.effective_limit(limits).to_string()),
        }
    }
}

/// Validate a raw query against `limits`.
pub fn validate(query: &LogQuery, limits: &QueryLimits) -> Result<ValidatedQuery, ValidationError> {
    let filename = validate_filename(query.filename.as_deref())?;
    let filter = validate_filter(query.filter.as_deref(), limits)?;
    let limit = validate_limit(query.limit.as_deref(), limits)?;
    Ok(ValidatedQuery {
        filename,
        filter,
        limit,
    })
}

/// The name must be one path segment: no traversal, no separators.
pub fn validate_filename(filename: Option<&str>) -> Result<String, ValidationError> {
    let name = match filename {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ValidationError::MissingFilename),
    };
    if name.contains("..") {
        return Err(ValidationError::InvalidFilename(format!(
            "'{name}' contains a parent-directory segment"
        )));
    }
    if name == "." || name.contains(['/', '\\', '\0']) {
        return Err(ValidationError::InvalidFilename(format!(
            "'{name}' is not a single file name"
        )));
    }
    Ok(name.to_string())
}

/// An absent filter means "no filter". A present one, even empty, must match
/// the allowed character set and length bounds.
pub fn validate_filter(
    filter: Option<&str>,
    limits: &QueryLimits,
) -> Result<Option<String>, ValidationError> {
    let Some(filter) = filter else {
        return Ok(None);
    };
    if !RE_FILTER.is_match(filter) {
        return Err(ValidationError::InvalidFilter(
            "only letters, digits, '-' and '_' are allowed".into(),
        ));
    }
    let len = filter.chars().count();
    if len < limits.min_filter_len || len > limits.max_filter_len {
        return Err(ValidationError::InvalidFilter(format!(
            "length must be between {} and {}",
            limits.min_filter_len, limits.max_filter_len
        )));
    }
    Ok(Some(filter.to_string()))
}

pub fn validate_limit(
    limit: Option<&str>,
    limits: &QueryLimits,
) -> Result<Option<usize>, ValidationError> {
    let raw = match limit.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidLimit(format!("'{raw}' is not an integer")))?;
    let in_range = usize::try_from(value)
        .ok()
        .filter(|v| (limits.min_limit..=limits.max_limit).contains(v));
    in_range
        .map(Some)
        .ok_or(ValidationError::LimitOutOfRange {
            min: limits.min_limit,
            max: limits.max_limit,
        })
}
