//! Application controller
//!
//! Owns the session registry and the collaborators every session needs
//! (the destination resolver and the window activator), and builds
//! sessions from parsed control requests. The GUI layer, when present,
//! supplies a real `WindowActivator`; a headless run uses the logging
//! one.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use echotail_ipc::{Request, SessionFactory};
use echotail_session::{Session, SessionGuard, SessionRegistry};
use echotail_sink::{PaneResolver, ResilientPaneWriter};
use echotail_tailer::TailReader;

/// Brings the application window to the foreground.
pub trait WindowActivator: Send + Sync {
    fn activate(&self);
}

/// Activator for headless runs: there is no window, so just say so.
pub struct LogActivator;

impl WindowActivator for LogActivator {
    fn activate(&self) {
        info!("activation requested, no window attached");
    }
}

/// Application controller wiring sessions to their collaborators.
pub struct App {
    registry: Arc<SessionRegistry>,
    resolver: Arc<dyn PaneResolver>,
    activator: Arc<dyn WindowActivator>,
}

impl App {
    /// Create the controller with its collaborators.
    pub fn new(resolver: Arc<dyn PaneResolver>, activator: Arc<dyn WindowActivator>) -> Arc<Self> {
        Arc::new(Self {
            registry: Arc::new(SessionRegistry::new()),
            resolver,
            activator,
        })
    }

    /// The registry the scheduler should tick.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Build the session factory handed to the control server.
    pub fn session_factory(self: &Arc<Self>) -> SessionFactory {
        let app = Arc::clone(self);
        Arc::new(move |request| app.build_session(request))
    }

    /// Start a tailing session directly, bypassing the control channel
    /// (the `--file` startup option).
    pub fn start_log_file_session(
        &self,
        file: PathBuf,
        solution: String,
        skip_existing: bool,
    ) -> SessionGuard {
        self.log_file_session(file, solution, skip_existing)
    }

    fn build_session(&self, request: Request) -> SessionGuard {
        match request {
            Request::Activate => {
                self.activator.activate();
                SessionGuard::register(self.registry(), Arc::new(ActivationSession))
            }
            Request::LogFile {
                file,
                solution,
                skip_existing,
            } => self.log_file_session(file, solution, skip_existing),
        }
    }

    fn log_file_session(
        &self,
        file: PathBuf,
        solution: String,
        skip_existing: bool,
    ) -> SessionGuard {
        info!(
            file = %file.display(),
            solution = %solution,
            skip_existing,
            "session established"
        );
        let reader = if skip_existing {
            TailReader::skipping_existing(&file)
        } else {
            TailReader::new(&file)
        };
        let writer = ResilientPaneWriter::new(Arc::clone(&self.resolver), solution);
        let session = Arc::new(LogFileSession {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            activator: Arc::clone(&self.activator),
        });
        SessionGuard::register(self.registry(), session)
    }
}

/// Session behind a bare `Activate` request. The activation itself
/// happens when the request is handled; the session only keeps the
/// connection accounted for until the peer disconnects.
struct ActivationSession;

impl Session for ActivationSession {
    fn tick(&self) {}

    fn line_received(&self, line: &str) {
        debug!(line = %line, "unexpected line on activation session");
    }
}

/// One tailed file bound to one destination.
struct LogFileSession {
    reader: Mutex<TailReader>,
    writer: Mutex<ResilientPaneWriter>,
    activator: Arc<dyn WindowActivator>,
}

impl Session for LogFileSession {
    fn tick(&self) {
        let text = match self.reader.lock().read_next() {
            Some(text) => text,
            // Failed poll; the reader retries on the next tick.
            None => return,
        };
        if text.is_empty() {
            return;
        }
        // A failed forward drops the text: the offset has already
        // advanced, delivery is at-most-once and never buffers.
        self.writer.lock().write(&text);
    }

    fn line_received(&self, line: &str) {
        if line == "Activate" {
            self.activator.activate();
        } else {
            debug!(line = %line, "unrecognized session line ignored");
        }
    }
}

impl Drop for LogFileSession {
    fn drop(&mut self) {
        let tail = self.reader.get_mut().metrics().snapshot();
        let sink = self.writer.get_mut().metrics().snapshot();
        info!(
            file = %self.reader.get_mut().path().display(),
            bytes_read = tail.bytes_read,
            rotations = tail.rotations,
            read_failures = tail.failures,
            writes_failed = sink.writes_failed,
            "session ended"
        );
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
