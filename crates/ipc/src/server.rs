//! Pooled control server over a local socket
//!
//! A fixed pool of acceptor slots shares one Unix domain socket. Each
//! slot loops forever: accept a connection, read the request line,
//! build a session through the factory, relay subsequent lines into the
//! session until end-of-stream, tear the session down, accept again.
//! The pool size bounds how many control connections are served at
//! once; later clients wait in the accept backlog.
//!
//! # Single-instance detection
//!
//! Binding claims the socket path for this process. If the path already
//! exists it is probed with a client connect: a peer that accepts means
//! another instance is running; a stale file left behind by a crashed
//! process is removed and the path re-bound.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use echotail_session::SessionGuard;

use crate::error::{ControlError, Result};
use crate::protocol::Request;

/// Number of acceptor slots in the pool.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// How long the liveness probe waits for an accepting peer.
const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Builds a registered session for a parsed request.
///
/// The returned guard keeps the session registered; the connection
/// handler drops it at end-of-stream, which deregisters the session.
pub type SessionFactory = Arc<dyn Fn(Request) -> SessionGuard + Send + Sync>;

/// Default socket path under the OS temp directory.
pub fn default_socket_path() -> PathBuf {
    std::env::temp_dir().join("echotail.sock")
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ControlServerConfig {
    /// Path of the Unix socket to claim
    pub socket_path: PathBuf,

    /// Number of acceptor slots; bounds concurrent control connections
    pub pool_size: usize,
}

impl Default for ControlServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl ControlServerConfig {
    /// Create config with a custom socket path
    pub fn with_socket_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.socket_path = path.as_ref().to_path_buf();
        self
    }

    /// Create config with a custom pool size
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }
}

/// Control server owning the socket and the acceptor pool.
pub struct ControlServer {
    config: ControlServerConfig,
    factory: SessionFactory,
}

impl ControlServer {
    /// Create a new control server
    pub fn new(config: ControlServerConfig, factory: SessionFactory) -> Self {
        Self { config, factory }
    }

    /// Check whether another instance is currently serving `path`.
    pub async fn is_already_running(path: &Path) -> bool {
        probe(path).await
    }

    /// Claim the socket and serve until the token is cancelled.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let listener = claim_socket(&self.config.socket_path).await?;
        info!(
            path = %self.config.socket_path.display(),
            slots = self.config.pool_size,
            "control server listening"
        );

        let listener = Arc::new(listener);
        let mut slots = Vec::with_capacity(self.config.pool_size);
        for slot in 0..self.config.pool_size {
            slots.push(serve_slot(
                slot,
                Arc::clone(&listener),
                Arc::clone(&self.factory),
                cancel.clone(),
            ));
        }
        for handle in slots {
            let _ = handle.await;
        }

        // Remove the socket file on orderly shutdown so the next start
        // does not have to go through the stale-file probe.
        let _ = std::fs::remove_file(&self.config.socket_path);
        info!("control server stopped");
        Ok(())
    }
}

/// Bind the socket path, evicting a stale file if its owner is gone.
async fn claim_socket(path: &Path) -> Result<UnixListener> {
    if path.exists() {
        if probe(path).await {
            return Err(ControlError::AlreadyRunning {
                path: path.display().to_string(),
            });
        }
        debug!(path = %path.display(), "removing stale socket file");
        std::fs::remove_file(path)?;
    }
    Ok(UnixListener::bind(path)?)
}

/// True when a peer is accepting connections on `path`.
async fn probe(path: &Path) -> bool {
    matches!(
        tokio::time::timeout(PROBE_TIMEOUT, UnixStream::connect(path)).await,
        Ok(Ok(_))
    )
}

/// One acceptor slot: an unbounded loop across connections.
fn serve_slot(
    slot: usize,
    listener: Arc<UnixListener>,
    factory: SessionFactory,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            debug!(slot, "waiting for a connection");
            tokio::select! {
                _ = cancel.cancelled() => break,
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            debug!(slot, "connection established");
                            if let Err(e) = handle_connection(slot, stream, &factory, &cancel).await {
                                // Aborts only this connection; the slot
                                // goes straight back to accepting.
                                warn!(slot, error = %e, "connection aborted");
                            }
                            debug!(slot, "connection ended");
                        }
                        Err(e) => {
                            warn!(slot, error = %e, "accept failed");
                        }
                    }
                }
            }
        }
    })
}

/// Serve one connection: request line, then session lines until EOF.
async fn handle_connection(
    slot: usize,
    stream: UnixStream,
    factory: &SessionFactory,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut lines = BufReader::new(stream).lines();

    let first = tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        line = lines.next_line() => line?,
    };
    let Some(first) = first else {
        // A liveness probe or a peer that changed its mind; not an error.
        debug!(slot, "connection closed without a request");
        return Ok(());
    };
    debug!(slot, line = %first, "request line received");
    let request = Request::parse(&first)?;

    let guard = factory(request);
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        match line {
            Some(line) => {
                debug!(slot, line = %line, "session line received");
                guard.session().line_received(&line);
            }
            None => {
                debug!(slot, "end of stream");
                break;
            }
        }
    }
    // The guard drops here, deregistering the session before the slot
    // accepts its next connection.
    Ok(())
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
