// src/errors.rs

//! Crate-wide error types.
//!
//! The library reports failures through three closed taxonomies:
//! - [`ProcessError`] for spawning and awaiting external commands,
//! - [`crate::dag::GraphError`] for the leveling algorithm,
//! - [`BuildError`] for the target scheduler.
//!
//! [`TiermakeError`] wraps them together with the manifest/IO failures seen
//! by the driver.

use thiserror::Error;

/// Failure while spawning or awaiting a single external process.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("cannot spawn an empty command")]
    EmptyCommand,

    #[error("failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for process {pid}: {source}")]
    WaitFailed {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("process {pid} exited with code {code}")]
    NonZeroExit { pid: u32, code: i32 },

    #[error("process {pid} was terminated{}", signal_suffix(.signal))]
    Terminated { pid: u32, signal: Option<i32> },
}

fn signal_suffix(signal: &Option<i32>) -> String {
    match signal {
        Some(sig) => format!(" by signal {sig}"),
        None => String::new(),
    }
}

/// Failure of a build request.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A dependency is neither a registered target nor present on disk.
    #[error("no rule to make target '{0}'")]
    NoRuleForTarget(String),

    #[error("cyclic dependency involving '{0}'")]
    CyclicDependency(String),

    #[error("command for target '{target}' failed")]
    CommandFailed {
        target: String,
        #[source]
        source: ProcessError,
    },
}

impl BuildError {
    /// The artifact the error is about.
    pub fn artifact(&self) -> &str {
        match self {
            BuildError::NoRuleForTarget(a) | BuildError::CyclicDependency(a) => a,
            BuildError::CommandFailed { target, .. } => target,
        }
    }
}

#[derive(Error, Debug)]
pub enum TiermakeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cycle detected between targets: {0}")]
    TargetCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TiermakeError>;
