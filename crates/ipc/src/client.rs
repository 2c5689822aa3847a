//! Control client
//!
//! Connects to a running instance's control socket and speaks the line
//! protocol. Keeping the client alive keeps the server-side session
//! alive: the server tears the session down at end-of-stream.

use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tracing::debug;

use crate::error::{ControlError, Result};
use crate::protocol::Request;

/// How long to wait for the server to accept the connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Client side of a control connection.
pub struct ControlClient {
    stream: UnixStream,
}

impl ControlClient {
    /// Connect to the control socket at `path`.
    pub async fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let stream = tokio::time::timeout(CONNECT_TIMEOUT, UnixStream::connect(path))
            .await
            .map_err(|_| ControlError::ConnectTimeout)??;
        debug!(path = %path.display(), "connected to control socket");
        Ok(Self { stream })
    }

    /// Send a request line.
    pub async fn send(&mut self, request: &Request) -> Result<()> {
        self.send_line(&request.to_line()).await
    }

    /// Send one raw protocol line.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await?;
        Ok(())
    }
}
