// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::platform::ChangeOp;

/// Command-line arguments for the `selfreload` demo server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "selfreload",
    version,
    about = "Keep running, and restart in place whenever this binary is rebuilt.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML). A missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = "Reload.toml")]
    pub config: String,

    /// Additional directory to watch; changes are logged.
    #[arg(long = "dir", value_name = "PATH")]
    pub dirs: Vec<PathBuf>,

    /// Additional directory whose changes restart the process.
    #[arg(long = "restart-dir", value_name = "PATH")]
    pub restart_dirs: Vec<PathBuf>,

    /// Grace period in milliseconds between a change and its action.
    ///
    /// Overrides `[reload].grace_period_ms` from the config file.
    #[arg(long, value_name = "MS")]
    pub grace_ms: Option<u64>,

    /// Operation that fires a restart (create, write, ...).
    ///
    /// Defaults to the platform's usual trigger: create on BSD/macOS, write
    /// on Linux.
    #[arg(long, value_name = "OP")]
    pub trigger: Option<ChangeOp>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SELFRELOAD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate and print what would be watched, then exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
