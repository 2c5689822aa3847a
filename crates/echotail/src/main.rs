//! echotail - forward appended log text into a debug output destination
//!
//! # Usage
//!
//! ```bash
//! # Run the daemon, tailing a file from its current start
//! echotail serve --file /var/log/build.log
//!
//! # Ask the running daemon to tail another file for solution "MyApp"
//! echotail log-file /var/log/other.log --solution MyApp
//!
//! # Bring the running daemon's window to the foreground
//! echotail activate
//! ```
//!
//! A second `serve` detects the running instance through the control
//! socket, asks it to activate its window, and exits non-zero.

mod app;
mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use echotail_config::LogFormat;

/// Forward appended log text into a debug output destination
#[derive(Parser, Debug)]
#[command(name = "echotail")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the daemon (default)
    Serve(cmd::serve::ServeArgs),

    /// Ask the running instance to tail a file
    LogFile(cmd::log_file::LogFileArgs),

    /// Bring the running instance's window to the foreground
    Activate(cmd::activate::ActivateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Serve(args)) => cmd::serve::run(args).await,
        Some(Command::LogFile(args)) => cmd::log_file::run(args).await,
        Some(Command::Activate(args)) => cmd::activate::run(args).await,
        // No subcommand = run the daemon (default behavior)
        None => cmd::serve::run(cmd::serve::ServeArgs::default()).await,
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    match format {
        LogFormat::Console => tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
    }

    Ok(())
}
