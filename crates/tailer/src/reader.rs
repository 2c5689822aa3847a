//! Polling tail reader with failure recovery
//!
//! `TailReader` returns the bytes appended to a file since the previous
//! successful poll. It remembers a byte offset and caches an open read
//! handle; any I/O failure drops the cached handle, is logged, and the
//! poll is retried by the caller on its next tick.
//!
//! # Design
//!
//! - **Polling, not notifications**: change notifications are unreliable
//!   on network paths and some file systems; polling trades a fixed
//!   latency bound (the poll interval) for resilience everywhere.
//! - **Rotation heuristic**: a file shorter than the remembered offset
//!   is treated as rotated or truncated and re-read from the start.
//!   True rotation is indistinguishable from legitimate truncation, so
//!   when in doubt the reader starts over: duplicating old data beats
//!   losing new data.
//! - **Shared access**: the read handle never blocks the process that
//!   is writing or rotating the file (on Windows the handle is opened
//!   with read/write/delete sharing).

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

/// Largest number of bytes consumed by a single poll. A backlog bigger
/// than this is drained over consecutive polls.
const MAX_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Reads newly appended text from a growing file, one poll at a time.
pub struct TailReader {
    path: PathBuf,
    /// Next byte position to read from.
    offset: u64,
    /// Cached read handle, dropped on any failure.
    file: Option<File>,
    /// Trailing bytes of an incomplete UTF-8 sequence, carried into the
    /// next poll so a read landing mid-character never corrupts output.
    pending: Vec<u8>,
    metrics: Arc<TailMetrics>,
}

impl TailReader {
    /// Create a reader that replays the file's existing content first.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            file: None,
            pending: Vec::new(),
            metrics: Arc::new(TailMetrics::new()),
        }
    }

    /// Create a reader positioned at the file's current end.
    ///
    /// If the length cannot be queried the reader starts at offset 0,
    /// so the existing content is replayed once the file turns up.
    pub fn skipping_existing(path: impl Into<PathBuf>) -> Self {
        let mut reader = Self::new(path);
        match fs::metadata(&reader.path) {
            Ok(meta) => {
                info!(
                    path = %reader.path.display(),
                    bytes = meta.len(),
                    "skipping bytes already in the file"
                );
                reader.offset = meta.len();
            }
            Err(e) => {
                warn!(
                    path = %reader.path.display(),
                    error = %e,
                    "cannot query file length, existing content will be replayed"
                );
            }
        }
        reader
    }

    /// The file being tailed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next byte position to read from.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Get a handle to this reader's metrics.
    pub fn metrics(&self) -> Arc<TailMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Read the text appended since the previous successful poll.
    ///
    /// Returns `None` when the poll failed (file missing, locked, or
    /// otherwise unreadable); the caller just retries on its next tick.
    /// Returns `Some` with empty text when nothing new was appended.
    pub fn read_next(&mut self) -> Option<String> {
        self.metrics.record_poll();

        // Fresh length query every poll; a cached handle may report a
        // stale length for a file another process is appending to.
        let length = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "failed to query file length");
                self.metrics.record_failure();
                self.file = None;
                self.offset = 0;
                self.pending.clear();
                return None;
            }
        };

        if length < self.offset {
            info!(
                path = %self.path.display(),
                length,
                offset = self.offset,
                "file has shrunk, starting from the beginning"
            );
            self.metrics.record_rotation();
            self.offset = 0;
            self.pending.clear();
            // A replaced file keeps its old content readable through the
            // cached handle; reopen so the new file is what gets read.
            self.file = None;
        }

        if length == self.offset {
            return Some(String::new());
        }

        let buffer = match self.try_read(length - self.offset) {
            Some(buffer) => buffer,
            None => {
                self.metrics.record_failure();
                self.file = None;
                return None;
            }
        };

        self.offset += buffer.len() as u64;
        self.metrics.record_read(buffer.len() as u64);
        Some(self.decode(&buffer))
    }

    /// Open (or reuse) the cached handle, seek to the offset and read up
    /// to `want` bytes. Partial reads are normal. Returns `None` on any
    /// failure; the offset is left untouched so the next poll retries
    /// the same range.
    fn try_read(&mut self, want: u64) -> Option<Vec<u8>> {
        if self.file.is_none() {
            match open_shared(&self.path) {
                Ok(file) => self.file = Some(file),
                Err(e) => {
                    debug!(path = %self.path.display(), error = %e, "failed to open file");
                    return None;
                }
            }
        }
        let file = self.file.as_mut()?;

        if let Err(e) = file.seek(SeekFrom::Start(self.offset)) {
            debug!(path = %self.path.display(), error = %e, "failed to seek in file");
            return None;
        }

        let count = usize::try_from(want).unwrap_or(MAX_CHUNK_SIZE).min(MAX_CHUNK_SIZE);
        let mut buffer = vec![0u8; count];
        match file.read(&mut buffer) {
            Ok(n) => {
                buffer.truncate(n);
                Some(buffer)
            }
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "failed to read from file");
                None
            }
        }
    }

    /// Decode a chunk, carrying an incomplete trailing multi-byte
    /// sequence over to the next poll. Genuinely invalid bytes are
    /// replaced rather than failing the poll.
    fn decode(&mut self, bytes: &[u8]) -> String {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);
        match std::str::from_utf8(&data) {
            Ok(text) => text.to_owned(),
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                self.pending = data[valid..].to_vec();
                String::from_utf8_lossy(&data[..valid]).into_owned()
            }
            Err(_) => String::from_utf8_lossy(&data).into_owned(),
        }
    }
}

/// Open `path` for reading without restricting concurrent writers.
#[cfg(windows)]
fn open_shared(path: &Path) -> std::io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    // FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE, so the
    // process writing or rotating the file is never blocked by us.
    const SHARE_ALL: u32 = 0x1 | 0x2 | 0x4;

    fs::OpenOptions::new().read(true).share_mode(SHARE_ALL).open(path)
}

/// Open `path` for reading without restricting concurrent writers.
#[cfg(not(windows))]
fn open_shared(path: &Path) -> std::io::Result<File> {
    fs::OpenOptions::new().read(true).open(path)
}

/// Counters describing a reader's activity since creation.
#[derive(Debug, Default)]
pub struct TailMetrics {
    /// Polls performed (successful or not)
    polls: AtomicU64,

    /// Bytes delivered to the caller
    bytes_read: AtomicU64,

    /// Times the file was observed shorter than the offset
    rotations: AtomicU64,

    /// Polls that failed and will be retried
    failures: AtomicU64,
}

impl TailMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            polls: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    #[inline]
    fn record_poll(&self) {
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_read(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> TailMetricsSnapshot {
        TailMetricsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of tail reader metrics
#[derive(Debug, Clone, Copy)]
pub struct TailMetricsSnapshot {
    pub polls: u64,
    pub bytes_read: u64,
    pub rotations: u64,
    pub failures: u64,
}

#[cfg(test)]
#[path = "reader_test.rs"]
mod tests;
