//! Common types for sinks

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by all sink types
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Writes that reached the destination
    writes_ok: AtomicU64,

    /// Bytes that reached the destination
    bytes_written: AtomicU64,

    /// Writes that failed and invalidated the cached destination
    writes_failed: AtomicU64,

    /// Attempts to resolve the destination
    resolve_attempts: AtomicU64,

    /// Resolve attempts that came back empty
    resolve_failures: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            writes_ok: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            writes_failed: AtomicU64::new(0),
            resolve_attempts: AtomicU64::new(0),
            resolve_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_write(&self, bytes: u64) {
        self.writes_ok.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write_failure(&self) {
        self.writes_failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_resolve_attempt(&self) {
        self.resolve_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_resolve_failure(&self) {
        self.resolve_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> SinkMetricsSnapshot {
        SinkMetricsSnapshot {
            writes_ok: self.writes_ok.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            writes_failed: self.writes_failed.load(Ordering::Relaxed),
            resolve_attempts: self.resolve_attempts.load(Ordering::Relaxed),
            resolve_failures: self.resolve_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy)]
pub struct SinkMetricsSnapshot {
    pub writes_ok: u64,
    pub bytes_written: u64,
    pub writes_failed: u64,
    pub resolve_attempts: u64,
    pub resolve_failures: u64,
}
