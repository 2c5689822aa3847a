//! Local control channel
//!
//! Other processes (build scripts, a second launch of the application)
//! talk to a running instance over a local socket with a line-oriented
//! text protocol: one request line establishes the session, subsequent
//! lines are relayed to it, and disconnecting tears it down.

mod client;
mod error;
mod protocol;
mod server;

pub use client::ControlClient;
pub use error::{ControlError, Result};
pub use protocol::{ProtocolError, Request};
pub use server::{
    default_socket_path, ControlServer, ControlServerConfig, SessionFactory, DEFAULT_POOL_SIZE,
};
