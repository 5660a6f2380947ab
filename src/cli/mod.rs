//! CLI module for Vigil
//!
//! Command-line interface definitions and handlers for the uptime
//! monitoring daemon.
//!
//! # Commands
//!
//! - `start` - Start the monitoring daemon
//! - `check` - Run a one-shot retry-checked probe of a single URL
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the daemon with default config
//! vigil start
//!
//! # Probe one endpoint and exit non-zero if it is down
//! vigil check https://api.example.com/healthz --timeout 2
//!
//! # Generate shell completions
//! vigil completions bash > ~/.bash_completion.d/vigil
//! ```

pub mod check;
pub mod completions;
pub mod config;
pub mod start;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Vigil - HTTP uptime monitor
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about = "HTTP endpoint uptime monitoring daemon")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the monitoring daemon
    Start(StartArgs),
    /// Check a single endpoint once
    Check(CheckArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "vigil.toml")]
    pub config: PathBuf,

    /// Override scheduler tick period in seconds
    #[arg(short, long, env = "VIGIL_TICK_SECONDS")]
    pub tick: Option<u64>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VIGIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Run a single pass over all endpoints and exit
    #[arg(long)]
    pub oneshot: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Endpoint URL (e.g., https://api.example.com/healthz)
    pub url: String,

    /// Report label (defaults to the URL host)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Per-probe timeout in seconds
    #[arg(short, long, default_value = "5")]
    pub timeout: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "vigil.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
