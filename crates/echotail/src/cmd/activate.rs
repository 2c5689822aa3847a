//! `activate` - bring the running instance's window to the foreground

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use echotail_config::LogFormat;
use echotail_ipc::{default_socket_path, ControlClient, Request};

use crate::init_logging;

#[derive(Args, Debug)]
pub struct ActivateArgs {
    /// Control socket path
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

pub async fn run(args: ActivateArgs) -> Result<()> {
    init_logging(&args.log_level, LogFormat::Console)?;

    let socket = args.socket.unwrap_or_else(default_socket_path);
    let mut client = ControlClient::connect(&socket)
        .await
        .with_context(|| format!("no running instance on {}", socket.display()))?;
    client.send(&Request::Activate).await?;
    info!("activation requested");
    Ok(())
}
