// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `tiermake`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tiermake",
    version,
    about = "Rebuild stale targets level by level, in parallel.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the manifest (TOML).
    ///
    /// Default: `Tiermake.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Tiermake.toml")]
    pub manifest: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TIERMAKE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// What to do. Defaults to `build`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Rebuild the given targets (or the defaults) if they are stale.
    Build {
        /// Outputs to build. Empty means `[build].default`.
        #[arg(value_name = "TARGET")]
        targets: Vec<String>,

        /// Rebuild serially, ignoring timestamps.
        #[arg(long)]
        force: bool,
    },

    /// Build the defaults, then start `[build].run`.
    Run {
        /// Extra arguments appended to the run command.
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Delete every target output that exists.
    Clean,

    /// Print every target and whether it is up to date.
    Status,
}

impl Default for Command {
    fn default() -> Self {
        Command::Build {
            targets: Vec::new(),
            force: false,
        }
    }
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
