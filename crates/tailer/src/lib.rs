//! Resilient tail reading of growing log files
//!
//! The tailer polls a file for newly appended bytes and decodes them as
//! UTF-8 text. It tolerates the file being momentarily locked, missing,
//! rotated or truncated, and never surfaces I/O errors to the caller:
//! a failed poll simply yields nothing and is retried on the next one.

mod reader;

pub use reader::{TailMetrics, TailMetricsSnapshot, TailReader};
