// src/target/scheduler.rs

//! Build entry points.
//!
//! `build_if_needed` is the incremental, parallel path:
//!
//! ```text
//! stale? --no--> done
//!   | yes
//!   v
//! dependency graph -> levels -> for level = deepest ..= 0:
//!                                   spawn every stale target of the level
//!                                   wait for all of them (barrier)
//! ```
//!
//! Within a level the targets are independent by construction, so all of
//! their processes run at the same time. Nothing of level `i` starts before
//! every process of level `i + 1` has finished successfully.
//!
//! A target with several commands runs them as a chain: the first command of
//! every target in the level is spawned up front, follow-up commands are
//! spawned while the barrier drains, each one once its predecessor exited
//! successfully. After the first failure no further follow-up is started.
//!
//! `build` is the serial path: dependencies first, depth-first, then all
//! commands of the target, regardless of timestamps.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::dag::{GraphError, Levels};
use crate::errors::{BuildError, ProcessError};
use crate::exec::Process;
use crate::target::{Artifact, Target, TargetMap};

impl From<GraphError<Artifact>> for BuildError {
    fn from(err: GraphError<Artifact>) -> Self {
        match err {
            GraphError::CycleDetected(v) => BuildError::CyclicDependency(v),
            GraphError::VertexNotFound(v) => BuildError::NoRuleForTarget(v),
        }
    }
}

/// A target whose current command is running inside a level batch.
struct Running<'t> {
    target: &'t Target,
    command: usize,
    process: Process,
}

impl TargetMap {
    /// Rebuild `output` and whatever it depends on, but only what is stale.
    ///
    /// Returns immediately, without spawning anything, when `output` is up
    /// to date. On failure, artifacts completed by earlier levels stay on
    /// disk.
    pub fn build_if_needed(&self, output: &str) -> Result<(), BuildError> {
        self.build_all_if_needed(&[output])
    }

    /// [`TargetMap::build_if_needed`] for several outputs sharing one leveling
    /// pass, so common dependencies are built once and independent outputs
    /// run in parallel.
    pub fn build_all_if_needed<S: AsRef<str>>(&self, outputs: &[S]) -> Result<(), BuildError> {
        let roots: Vec<Artifact> = outputs
            .iter()
            .map(AsRef::as_ref)
            .filter(|output| self.needs_rebuild(output))
            .map(str::to_string)
            .collect();

        if roots.is_empty() {
            info!("everything is up to date");
            return Ok(());
        }

        let levels = self.dependency_graph().level(&roots)?;
        debug!(
            levels = levels.len(),
            vertices = levels.vertex_count(),
            "dependency graph leveled"
        );

        self.check_leaves(&levels)?;

        for (level, vertices) in levels.deepest_first() {
            let batch: Vec<&Target> = vertices
                .iter()
                .filter_map(|v| self.targets.get(v))
                .filter(|target| self.needs_rebuild(target.output()))
                .collect();

            if batch.is_empty() {
                debug!(level, "nothing to rebuild at this level");
                continue;
            }

            info!(level, targets = batch.len(), "building level");
            self.run_batch(&batch)?;
        }

        Ok(())
    }

    /// Build `output` serially, dependencies first, always running every
    /// command. Each target runs at most once per call.
    pub fn build(&self, output: &str) -> Result<(), BuildError> {
        let mut path = Vec::new();
        let mut done = HashSet::new();
        self.build_serial(output, &mut path, &mut done)
    }

    fn build_serial<'a>(
        &'a self,
        output: &'a str,
        path: &mut Vec<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<(), BuildError> {
        if done.contains(output) {
            return Ok(());
        }
        let target = self
            .targets
            .get(output)
            .ok_or_else(|| BuildError::NoRuleForTarget(output.to_string()))?;
        if path.contains(&output) {
            return Err(BuildError::CyclicDependency(output.to_string()));
        }

        path.push(output);
        for dep in target.dependencies() {
            if self.targets.contains_key(dep) {
                self.build_serial(dep, path, done)?;
            } else if !self.fs.exists(Path::new(dep)) {
                return Err(BuildError::NoRuleForTarget(dep.clone()));
            }
        }
        path.pop();

        if target.commands().is_empty() {
            return Err(command_failed(target, ProcessError::EmptyCommand));
        }
        for cmd in target.commands() {
            cmd.run_with(self.spawner.as_ref())
                .map_err(|source| command_failed(target, source))?;
        }

        info!(target = %target.output(), "target built");
        done.insert(output);
        Ok(())
    }

    /// Every vertex no target produces must already exist.
    fn check_leaves(&self, levels: &Levels<Artifact>) -> Result<(), BuildError> {
        for vertex in levels.iter().flatten() {
            if !self.targets.contains_key(vertex) && !self.fs.exists(Path::new(vertex)) {
                error!(artifact = %vertex, "no rule to make target");
                return Err(BuildError::NoRuleForTarget(vertex.clone()));
            }
        }
        Ok(())
    }

    /// Run one level: spawn, then wait for everything (the barrier).
    ///
    /// Processes already spawned are always awaited, even once the batch has
    /// failed; their results are then only logged.
    fn run_batch(&self, batch: &[&Target]) -> Result<(), BuildError> {
        let mut running = Vec::with_capacity(batch.len());
        let mut failure = None;

        for &target in batch {
            match self.start(target, 0) {
                Ok(process) => running.push(Running {
                    target,
                    command: 0,
                    process,
                }),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        for job in running {
            if let Err(err) = self.finish(job, failure.is_some()) {
                match &failure {
                    None => failure = Some(err),
                    Some(_) => warn!(error = %err, "discarding result of a sibling in a failed batch"),
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&self, target: &Target, command: usize) -> Result<Process, BuildError> {
        let cmd = target
            .commands()
            .get(command)
            .ok_or_else(|| command_failed(target, ProcessError::EmptyCommand))?;
        cmd.spawn_with(self.spawner.as_ref())
            .map_err(|source| command_failed(target, source))
    }

    /// Wait for a running target and, unless the batch already failed, keep
    /// its command chain going.
    fn finish(&self, job: Running<'_>, batch_failed: bool) -> Result<(), BuildError> {
        let Running {
            target,
            mut command,
            mut process,
        } = job;

        loop {
            process
                .wait()
                .map_err(|source| command_failed(target, source))?;

            command += 1;
            if command >= target.commands().len() {
                info!(target = %target.output(), "target built");
                return Ok(());
            }
            if batch_failed {
                debug!(
                    target = %target.output(),
                    "batch failed; not starting remaining commands"
                );
                return Ok(());
            }
            process = self.start(target, command)?;
        }
    }
}

fn command_failed(target: &Target, source: ProcessError) -> BuildError {
    error!(target = %target.output(), error = %source, "command failed");
    BuildError::CommandFailed {
        target: target.output().to_string(),
        source,
    }
}
