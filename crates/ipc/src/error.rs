//! Error types for the control channel

use std::io;

use thiserror::Error;

use crate::protocol::ProtocolError;

/// Errors that can occur on the control channel
#[derive(Debug, Error)]
pub enum ControlError {
    /// I/O error (socket operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Another instance already owns the control socket
    #[error("another instance is already serving {path}")]
    AlreadyRunning { path: String },

    /// Malformed request line
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Connect attempt timed out
    #[error("timed out connecting to the control socket")]
    ConnectTimeout,
}

/// Result type for control channel operations
pub type Result<T> = std::result::Result<T, ControlError>;
