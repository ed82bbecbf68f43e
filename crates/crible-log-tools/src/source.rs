//! Log source abstraction: tail log files from disk or from memory.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{LogResult, ScanError};
use crate::scanner::ReverseLineScanner;

/// Abstraction over where a watcher's log files live.
///
/// Routes only ever see this trait, so tests can swap the filesystem for
/// `MockLogSource`.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Up to `limit` lines of `filename` containing `filter`, newest first.
    ///
    /// `filename` must already be validated as a single path segment.
    async fn tail_lines(
        &self,
        filename: &str,
        filter: Option<&str>,
        limit: usize,
    ) -> LogResult<Vec<String>>;

    /// Human-readable location of `filename`, for logging.
    fn describe(&self, filename: &str) -> String;
}

/// Reads logs from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileLogSource {
    root: PathBuf,
    scanner: ReverseLineScanner,
}

impl FileLogSource {
    pub fn new(root: impl Into<PathBuf>, block_size: usize) -> Self {
        Self {
            root: root.into(),
            scanner: ReverseLineScanner::new(block_size),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn tail_lines(
        &self,
        filename: &str,
        filter: Option<&str>,
        limit: usize,
    ) -> LogResult<Vec<String>> {
        let path = self.root.join(filename);
        let filter = filter.map(str::to_owned);
        let scanner = self.scanner;
        // Backward reads are blocking; keep them off the async workers.
        tokio::task::spawn_blocking(move || scanner.scan_file(&path, filter.as_deref(), limit))
            .await
            .map_err(|e| ScanError::Task(e.to_string()))?
    }

    fn describe(&self, filename: &str) -> String {
        self.root.join(filename).display().to_string()
    }
}
