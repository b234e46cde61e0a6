//! mlwatch CLI
//!
//! Command-line tools for mlwatch log files.
//!
//! # Commands
//!
//! - `log` - Append records to a log file
//! - `dump` - Decode a closed log file
//! - `tail` - Follow a log file as it grows
//! - `verify` - Check log integrity
//! - `agent` - Tail and forward to a dashboard or collector
//! - `collector` - Receive records from remote agents

mod commands;

use clap::{Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// mlwatch log shipping tools.
#[derive(Parser)]
#[command(name = "mlwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the log file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append one record per message
    Log {
        /// fsync after each record
        #[arg(long)]
        sync: bool,

        /// Messages to append
        #[arg(required = true)]
        messages: Vec<String>,
    },

    /// Decode a closed log file
    Dump {
        /// Maximum number of records to dump
        #[arg(short, long)]
        limit: Option<usize>,

        /// Start from this byte offset (must be a frame boundary)
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Follow a log file, printing records as they are appended
    Tail {
        /// Poll interval in milliseconds
        #[arg(long, default_value = "1000")]
        interval_ms: u64,
    },

    /// Verify log integrity
    Verify,

    /// Tail a log and forward records to a dashboard or collector
    Agent {
        /// Collector URL; serve a local dashboard when omitted
        #[arg(long)]
        remote: Option<String>,

        /// Dashboard host
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Dashboard port
        #[arg(long, env = "MLWATCH_PORT", default_value = "5000")]
        port: u16,

        /// Tail poll interval in milliseconds
        #[arg(long, default_value = "5000")]
        poll_ms: u64,

        /// Forwarding interval in seconds
        #[arg(long, default_value = "15")]
        interval_secs: u64,
    },

    /// Receive records posted by remote agents
    Collector {
        /// Host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to bind
        #[arg(long, env = "MLWATCH_PORT", default_value = "5000")]
        port: u16,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the default level.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Log { sync, messages } => {
            let path = cli.path.ok_or("Log path required for log")?;
            commands::log::run(&path, &messages, sync)?;
        }
        Commands::Dump {
            limit,
            offset,
            format,
        } => {
            let path = cli.path.ok_or("Log path required for dump")?;
            commands::dump::run(&path, limit, offset, &format)?;
        }
        Commands::Tail { interval_ms } => {
            let path = cli.path.ok_or("Log path required for tail")?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::tail::run(&path, Duration::from_millis(interval_ms)))?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Log path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Agent {
            remote,
            host,
            port,
            poll_ms,
            interval_secs,
        } => {
            let path = cli.path.ok_or("Log path required for agent")?;
            let options = commands::agent::AgentOptions {
                remote,
                bind_addr: SocketAddr::new(host, port),
                poll_interval: Duration::from_millis(poll_ms),
                forward_interval: Duration::from_secs(interval_secs),
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::agent::run(&path, options))?;
        }
        Commands::Collector { host, port } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::collector::run(SocketAddr::new(host, port)))?;
        }
        Commands::Version => {
            println!("mlwatch CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Frame format v{}", mlwatch_codec::VERSION);
        }
    }

    Ok(())
}
