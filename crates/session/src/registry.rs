//! Session registry
//!
//! The one piece of genuinely shared mutable state in the core: mutated
//! by connection handlers (add on session creation, remove on
//! disconnect) and read by the scheduler (one snapshot per cycle).
//! Snapshot-then-iterate keeps registry mutation from racing with tick
//! iteration: a session removed mid-cycle is simply absent from the
//! next cycle's snapshot.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::Session;

/// The set of currently active sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<Vec<Arc<dyn Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session.
    pub fn add(&self, session: Arc<dyn Session>) {
        let mut sessions = self.sessions.write();
        sessions.push(session);
        debug!(active = sessions.len(), "session registered");
    }

    /// Deregister a session.
    ///
    /// Sessions are compared by identity, never by content: several
    /// sessions may tail the same file, each with its own offset, and
    /// removing one leaves the others untouched.
    pub fn remove(&self, session: &Arc<dyn Session>) {
        let mut sessions = self.sessions.write();
        sessions.retain(|s| !Arc::ptr_eq(s, session));
        debug!(active = sessions.len(), "session deregistered");
    }

    /// Clone the current session set for iteration.
    pub fn snapshot(&self) -> Vec<Arc<dyn Session>> {
        self.sessions.read().clone()
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no session is active.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Keeps a session registered for as long as it is held.
///
/// Connection handlers hold the guard while the peer stays connected;
/// dropping it (end-of-stream, handler error, shutdown) deregisters the
/// session before its resources are released, so no later tick can
/// observe a disposed session.
pub struct SessionGuard {
    registry: Arc<SessionRegistry>,
    session: Arc<dyn Session>,
}

impl SessionGuard {
    /// Register `session` and return the guard keeping it registered.
    pub fn register(registry: Arc<SessionRegistry>, session: Arc<dyn Session>) -> Self {
        registry.add(Arc::clone(&session));
        Self { registry, session }
    }

    /// The guarded session.
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.session);
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
