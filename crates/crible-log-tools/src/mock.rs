//! Mock log source for testing: serves pre-loaded log content.

use std::collections::HashMap;
use std::io::Cursor;

use async_trait::async_trait;

use crate::error::{LogResult, ScanError};
use crate::scanner::ReverseLineScanner;
use crate::source::LogSource;

/// A mock log source that serves in-memory files by name.
///
/// Content is scanned with the real `ReverseLineScanner`, so block-boundary
/// behaviour matches `FileLogSource`.
pub struct MockLogSource {
    files: HashMap<String, Vec<u8>>,
    scanner: ReverseLineScanner,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            scanner: ReverseLineScanner::new(16),
        }
    }

    /// Add a file from lines, each terminated by `\n`.
    pub fn add_file(&mut self, name: impl Into<String>, lines: &[&str]) {
        let mut content = Vec::new();
        for line in lines {
            content.extend_from_slice(line.as_bytes());
            content.push(b'\n');
        }
        self.files.insert(name.into(), content);
    }

    /// Add a file with exact raw content.
    pub fn add_raw(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), content.into());
    }

    /// A mock with `letters.log` holding `A` through `J`.
    pub fn with_letters() -> Self {
        let mut m = Self::new();
        m.add_file(
            "letters.log",
            &["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"],
        );
        m
    }

    /// A mock with a short nginx-style `access.log`.
    pub fn with_access_log() -> Self {
        let mut m = Self::new();
        m.add_file(
            "access.log",
            &[
                r#"127.0.0.1 - - [15/Jan/2024:12:00:01 +0000] "GET / HTTP/1.1" 200 612"#,
                r#"10.0.0.7 - - [15/Jan/2024:12:00:02 +0000] "GET /health HTTP/1.1" 200 15"#,
                r#"127.0.0.1 - - [15/Jan/2024:12:00:05 +0000] "POST /login HTTP/1.1" 401 38"#,
                r#"10.0.0.7 - - [15/Jan/2024:12:00:09 +0000] "GET /api/items HTTP/1.1" 200 2048"#,
                r#"127.0.0.1 - - [15/Jan/2024:12:00:12 +0000] "GET /favicon.ico HTTP/1.1" 404 153"#,
            ],
        );
        m
    }
}

impl Default for MockLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn tail_lines(
        &self,
        filename: &str,
        filter: Option<&str>,
        limit: usize,
    ) -> LogResult<Vec<String>> {
        let content = self
            .files
            .get(filename)
            .ok_or_else(|| ScanError::NotFound(filename.to_string()))?;
        self.scanner
            .scan(&mut Cursor::new(content.as_slice()), filter, limit)
            .map_err(|e| ScanError::io(filename, e))
    }

    fn describe(&self, filename: &str) -> String {
        format!("mock://{filename}")
    }
}
