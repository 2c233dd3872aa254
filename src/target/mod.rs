// src/target/mod.rs

//! Targets and the scheduler that rebuilds them.
//!
//! - [`Target`] binds one output artifact to its dependencies and the
//!   commands that produce it.
//! - [`map`] owns the registered targets ([`TargetMap`]) and derives the
//!   dependency graph from them.
//! - [`staleness`] decides whether an output must be rebuilt by comparing
//!   modification times.
//! - [`scheduler`] drives builds: a strictly serial `build` and a leveled,
//!   parallel `build_if_needed`.

pub mod map;
pub mod scheduler;
pub mod staleness;

pub use map::TargetMap;

use crate::exec::Cmd;

/// Path string identifying a build input or output. Two artifacts are the
/// same iff their strings are equal; nothing is canonicalized.
pub type Artifact = String;

/// One output artifact, the artifacts it depends on and the commands that
/// produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    output: Artifact,
    dependencies: Vec<Artifact>,
    commands: Vec<Cmd>,
}

impl Target {
    /// Target produced by a single command.
    pub fn new<I, S>(output: impl Into<String>, cmd: Cmd, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_commands(output, [cmd], dependencies)
    }

    /// Target produced by several commands run in order.
    pub fn with_commands<C, I, S>(output: impl Into<String>, commands: C, dependencies: I) -> Self
    where
        C: IntoIterator<Item = Cmd>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: output.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            commands: commands.into_iter().collect(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn dependencies(&self) -> &[Artifact] {
        &self.dependencies
    }

    pub fn commands(&self) -> &[Cmd] {
        &self.commands
    }
}
