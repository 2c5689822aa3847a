//! `log-file` - ask the running instance to tail a file
//!
//! The session lives exactly as long as this client's connection, so
//! the command stays in the foreground until Ctrl-C.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use echotail_config::LogFormat;
use echotail_ipc::{default_socket_path, ControlClient, Request};

use crate::init_logging;

#[derive(Args, Debug)]
pub struct LogFileArgs {
    /// File to tail (must be an absolute path)
    pub file: PathBuf,

    /// Destination name to forward to (default: first available)
    #[arg(long, default_value = "")]
    pub solution: String,

    /// Skip content already in the file instead of replaying it
    #[arg(long)]
    pub skip_existing: bool,

    /// Control socket path
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

pub async fn run(args: LogFileArgs) -> Result<()> {
    init_logging(&args.log_level, LogFormat::Console)?;

    if !args.file.is_absolute() {
        bail!("expected an absolute pathname, got '{}'", args.file.display());
    }

    let socket = args.socket.unwrap_or_else(default_socket_path);
    let mut client = ControlClient::connect(&socket)
        .await
        .with_context(|| format!("no running instance on {}", socket.display()))?;

    client
        .send(&Request::LogFile {
            file: args.file.clone(),
            solution: args.solution,
            skip_existing: args.skip_existing,
        })
        .await?;
    info!(file = %args.file.display(), "tailing session established, press Ctrl-C to end it");

    // The server ends the session when this connection closes.
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    Ok(())
}
