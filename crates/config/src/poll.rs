//! Polling configuration

use std::time::Duration;

use serde::Deserialize;

/// Default pause between polling cycles, in seconds.
const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Configuration for the polling scheduler
///
/// # Example
///
/// ```toml
/// [poll]
/// interval_secs = 0.2
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Pause between polling cycles, in (fractional) seconds.
    /// Default: 1.0
    pub interval_secs: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl PollConfig {
    /// The poll interval as a `Duration`.
    ///
    /// Only meaningful after validation: the interval must be a
    /// positive, finite number of seconds.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }
}
