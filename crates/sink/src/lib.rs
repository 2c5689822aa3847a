//! Output destinations for forwarded log text
//!
//! A destination is located by name, cached, and written to until a
//! write fails; the failed handle is discarded and the next write
//! resolves the destination again from scratch. The concrete lookup
//! (an IDE's debug output pane, a console, a test double) lives behind
//! the [`PaneResolver`] seam.

mod common;
mod console;
mod pane;

pub use common::{SinkMetrics, SinkMetricsSnapshot};
pub use console::{ConsolePane, ConsoleResolver};
pub use pane::{OutputPane, PaneResolver, ResilientPaneWriter};
