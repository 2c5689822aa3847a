//! Control socket configuration

use std::path::PathBuf;

use serde::Deserialize;

/// Default number of acceptor slots.
const DEFAULT_POOL_SIZE: usize = 10;

/// Configuration for the local control socket
///
/// # Example
///
/// ```toml
/// [control]
/// socket_path = "/run/user/1000/echotail.sock"
/// pool_size = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Path of the control socket. When unset, `echotail.sock` under
    /// the OS temp directory is used.
    pub socket_path: Option<PathBuf>,

    /// Number of acceptor slots; bounds concurrent control connections.
    /// Default: 10
    pub pool_size: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}
