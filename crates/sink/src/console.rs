//! Console destination
//!
//! Writes forwarded text verbatim to stdout. This is the stand-alone
//! and development destination; deployments with a real IDE wire their
//! own `PaneResolver` in front of the automation layer instead.

use std::io::{self, Write};

use crate::pane::{OutputPane, PaneResolver};

/// Destination that appends text to stdout.
pub struct ConsolePane;

impl OutputPane for ConsolePane {
    fn append(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
}

/// Resolver that hands out a console destination for any name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleResolver;

impl PaneResolver for ConsoleResolver {
    fn resolve(&self, _name: &str) -> Option<Box<dyn OutputPane>> {
        Some(Box::new(ConsolePane))
    }
}
