//! `serve` - run the daemon
//!
//! Loads configuration, refuses to start when another instance is
//! already serving the control socket (after asking it to come to the
//! foreground), then runs the scheduler and the control server until
//! Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use echotail_config::Config;
use echotail_ipc::{
    default_socket_path, ControlClient, ControlServer, ControlServerConfig, Request,
};
use echotail_session::Scheduler;
use echotail_sink::ConsoleResolver;

use crate::app::{App, LogActivator};
use crate::init_logging;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Tail this file immediately (must be an absolute path)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Destination name to forward to (default: first available)
    #[arg(long, default_value = "")]
    pub solution: String,

    /// Skip content already in the file instead of replaying it
    #[arg(long)]
    pub skip_existing: bool,

    /// Seconds between polling cycles (fractional values allowed)
    #[arg(long)]
    pub interval: Option<f64>,

    /// Control socket path
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Command-line options override the file; validate the result.
    if let Some(interval) = args.interval {
        config.poll.interval_secs = interval;
    }
    if let Some(socket) = &args.socket {
        config.control.socket_path = Some(socket.clone());
    }
    config.validate()?;

    let level = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.log.level.as_str());
    init_logging(level, config.log.format)?;

    if let Some(file) = &args.file {
        if !file.is_absolute() {
            bail!("expected an absolute pathname, got '{}'", file.display());
        }
    }

    let socket_path = config
        .control
        .socket_path
        .clone()
        .unwrap_or_else(default_socket_path);

    // Another instance already serving the socket? Bring its window to
    // the foreground and bow out.
    if ControlServer::is_already_running(&socket_path).await {
        warn!(path = %socket_path.display(), "another instance is already running, activating it");
        let mut client = ControlClient::connect(&socket_path).await?;
        client.send(&Request::Activate).await?;
        bail!("another instance is already running");
    }

    let app = App::new(Arc::new(ConsoleResolver), Arc::new(LogActivator));

    // A session started from the command line lives for the whole run.
    let _initial = args.file.as_ref().map(|file| {
        app.start_log_file_session(file.clone(), args.solution.clone(), args.skip_existing)
    });

    info!(
        interval_secs = config.poll.interval_secs,
        "polling every {} seconds", config.poll.interval_secs
    );

    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(app.registry(), config.poll.interval()).spawn(cancel.clone());

    let server_config = ControlServerConfig::default()
        .with_socket_path(&socket_path)
        .with_pool_size(config.control.pool_size);
    let server = ControlServer::new(server_config, app.session_factory());
    let mut server_task = tokio::spawn(server.run(cancel.clone()));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            cancel.cancel();
        }
        result = &mut server_task => {
            cancel.cancel();
            let _ = scheduler.await;
            result.context("control server task panicked")??;
            bail!("control server stopped unexpectedly");
        }
    }

    let _ = scheduler.await;
    let _ = server_task.await;
    Ok(())
}
