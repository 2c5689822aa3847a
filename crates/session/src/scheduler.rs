//! Timer-driven polling scheduler
//!
//! One recurring interval on one tokio task. Each cycle takes a
//! registry snapshot and ticks the sessions sequentially, so a slow
//! session can delay the next cycle but never overlap it, and two ticks
//! of the same session never run concurrently.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::SessionRegistry;

/// Default pause between polling cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Ticks every registered session once per interval.
pub struct Scheduler {
    registry: Arc<SessionRegistry>,
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler over `registry` with the given poll interval.
    pub fn new(registry: Arc<SessionRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Spawn the scheduling task.
    ///
    /// Runs until the token is cancelled. A cycle that overruns the
    /// interval delays the next cycle instead of piling up behind it.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_ms = self.interval.as_millis() as u64, "scheduler running");
            let mut timer = tokio::time::interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("scheduler stopped");
                        break;
                    }
                    _ = timer.tick() => {
                        let sessions = self.registry.snapshot();
                        trace!(count = sessions.len(), "tick cycle");
                        for session in &sessions {
                            session.tick();
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
