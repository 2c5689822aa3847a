//! Resilient writing to a lazily resolved destination
//!
//! The same recovery idiom as the tail reader's cached file handle:
//! resolve-or-reuse on the way in, use-or-invalidate on the way out.
//! A destination that disappears (its process exited, its pane was
//! closed) costs one failed write; the next write re-resolves it.

use std::io;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::SinkMetrics;

/// One resolved output destination.
pub trait OutputPane: Send {
    /// Append text verbatim to the destination.
    fn append(&mut self, text: &str) -> io::Result<()>;
}

/// Locates an output destination by name.
///
/// The empty name selects the first available destination. Returning
/// `None` means the destination cannot currently be located; the
/// caller tries again on a later write.
pub trait PaneResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Box<dyn OutputPane>>;
}

/// Best-effort writer around a cached, lazily resolved destination.
pub struct ResilientPaneWriter {
    resolver: Arc<dyn PaneResolver>,
    name: String,
    pane: Option<Box<dyn OutputPane>>,
    metrics: Arc<SinkMetrics>,
}

impl ResilientPaneWriter {
    /// Create a writer forwarding to the destination called `name`.
    pub fn new(resolver: Arc<dyn PaneResolver>, name: impl Into<String>) -> Self {
        Self {
            resolver,
            name: name.into(),
            pane: None,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// The destination name this writer forwards to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a handle to this writer's metrics.
    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Forward `text` to the destination.
    ///
    /// Returns `false` when the destination cannot be resolved or the
    /// write fails. A failed write discards the cached destination so
    /// the next call resolves it again from scratch. The text itself is
    /// not retried here; delivery is at-most-once.
    pub fn write(&mut self, text: &str) -> bool {
        if self.pane.is_none() {
            self.metrics.record_resolve_attempt();
            match self.resolver.resolve(&self.name) {
                Some(pane) => {
                    debug!(destination = %self.name, "resolved output destination");
                    self.pane = Some(pane);
                }
                None => {
                    self.metrics.record_resolve_failure();
                    return false;
                }
            }
        }

        let Some(pane) = self.pane.as_mut() else {
            return false;
        };
        match pane.append(text) {
            Ok(()) => {
                self.metrics.record_write(text.len() as u64);
                true
            }
            Err(e) => {
                warn!(
                    destination = %self.name,
                    error = %e,
                    "write to destination failed, discarding cached handle"
                );
                self.metrics.record_write_failure();
                self.pane = None;
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "pane_test.rs"]
mod tests;
