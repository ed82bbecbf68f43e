//! Reverse chunked line scanner.
//!
//! Reads a log from its end in fixed-size blocks and yields the newest
//! lines first, so a tail of a multi-gigabyte file costs a few reads rather
//! than a full load. A line that straddles two blocks is carried between
//! iterations as a byte fragment and only decoded and filtered once both
//! halves have been read.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{LogResult, ScanError};

/// Default block size, matching a typical filesystem block.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Backward line reader parameterised by block size.
#[derive(Debug, Clone, Copy)]
pub struct ReverseLineScanner {
    block_size: usize,
}

impl Default for ReverseLineScanner {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl ReverseLineScanner {
    /// A zero block size is clamped to one byte.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Scan the regular file at `path`.
    pub fn scan_file(
        &self,
        path: &Path,
        filter: Option<&str>,
        limit: usize,
    ) -> LogResult<Vec<String>> {
        let shown = path.display().to_string();
        let mut file = File::open(path).map_err(|e| ScanError::io(&shown, e))?;
        let meta = file.metadata().map_err(|e| ScanError::io(&shown, e))?;
        if !meta.is_file() {
            return Err(ScanError::NotAFile(shown));
        }
        let lines = self
            .scan(&mut file, filter, limit)
            .map_err(|e| ScanError::io(&shown, e))?;
        tracing::debug!(path = %shown, count = lines.len(), "scan complete");
        Ok(lines)
    }

    /// Return up to `limit` lines matching `filter`, newest first.
    pub fn scan<R: Read + Seek>(
        &self,
        reader: &mut R,
        filter: Option<&str>,
        limit: usize,
    ) -> std::io::Result<Vec<String>> {
        let mut out = LineSink::new(filter, limit);
        if out.is_full() {
            return Ok(out.lines);
        }

        let mut pos = reader.seek(SeekFrom::End(0))?;
        let mut buf = vec![0u8; self.block_size];
        // Head of the line that continues into the block read before this
        // one. `None` until the first (end-of-file) block has been read.
        let mut carry: Option<Vec<u8>> = None;

        while pos > 0 {
            let len = (self.block_size as u64).min(pos) as usize;
            pos -= len as u64;
            reader.seek(SeekFrom::Start(pos))?;
            reader.read_exact(&mut buf[..len])?;
            let block = &buf[..len];

            let mut segments = block.split(|&b| b == b'\n');
            // `split` always yields at least one segment.
            let head = segments.next().unwrap_or_default();
            let complete: Vec<&[u8]> = segments.collect();

            let Some((newest, interior)) = complete.split_last() else {
                // No newline in this block: the whole block belongs to the
                // carried line.
                carry = Some(join(head, carry.as_deref()));
                continue;
            };

            let tail_line = match carry.take() {
                // Trailing newline at end of file, not an empty last line.
                None if newest.is_empty() => None,
                None => Some(newest.to_vec()),
                Some(fragment) => Some(join(newest, Some(&fragment))),
            };
            if let Some(line) = tail_line {
                if out.push(&line) {
                    return Ok(out.lines);
                }
            }
            for line in interior.iter().rev() {
                if out.push(line) {
                    return Ok(out.lines);
                }
            }
            carry = Some(head.to_vec());
        }

        // Start of file reached: the carried fragment is the first line.
        if let Some(first) = carry {
            out.push(&first);
        }
        Ok(out.lines)
    }
}

/// Scan `path` with the given block size.
pub fn scan(
    path: &Path,
    filter: Option<&str>,
    limit: usize,
    block_size: usize,
) -> LogResult<Vec<String>> {
    ReverseLineScanner::new(block_size).scan_file(path, filter, limit)
}

fn join(older: &[u8], newer: Option<&[u8]>) -> Vec<u8> {
    let newer = newer.unwrap_or_default();
    let mut line = Vec::with_capacity(older.len() + newer.len());
    line.extend_from_slice(older);
    line.extend_from_slice(newer);
    line
}

/// Collects complete lines, applying the filter and the limit.
struct LineSink<'a> {
    filter: Option<&'a str>,
    limit: usize,
    lines: Vec<String>,
}

impl<'a> LineSink<'a> {
    fn new(filter: Option<&'a str>, limit: usize) -> Self {
        Self {
            filter,
            limit,
            lines: Vec::with_capacity(limit.min(1024)),
        }
    }

    fn is_full(&self) -> bool {
        self.lines.len() >= self.limit
    }

    /// Returns `true` once the sink holds `limit` lines.
    fn push(&mut self, raw: &[u8]) -> bool {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);
        if self.filter.is_none_or(|f| line.contains(f)) {
            self.lines.push(line.into_owned());
        }
        self.is_full()
    }
}
