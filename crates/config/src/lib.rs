//! echotail configuration
//!
//! TOML-based configuration loading with sensible defaults. A missing
//! section or an empty file yields a fully defaulted config; bad values
//! are rejected at load time so misconfiguration never becomes a
//! runtime fault.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use echotail_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[poll]\ninterval_secs = 0.5").unwrap();
//! assert_eq!(config.poll.interval_secs, 0.5);
//! ```

mod control;
mod error;
mod logging;
mod poll;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use control::ControlConfig;
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use poll::PollConfig;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Control socket configuration
    pub control: ControlConfig,

    /// Polling scheduler configuration
    pub poll: PollConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid
    /// TOML, or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Call again after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        if !self.poll.interval_secs.is_finite() || self.poll.interval_secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "poll.interval_secs must be a positive number of seconds, got {}",
                self.poll.interval_secs
            )));
        }
        if self.control.pool_size == 0 {
            return Err(ConfigError::Invalid(
                "control.pool_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
