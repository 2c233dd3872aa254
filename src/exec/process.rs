// src/exec/process.rs

//! Spawned processes and the pluggable spawner.
//!
//! A [`Process`] is handed out by exactly one spawn call and consumed by
//! exactly one [`Process::wait`]. Waiting blocks the calling thread; there is
//! no async runtime and no thread pool here, concurrency is simply several
//! children running at once.

use std::fmt;
use std::process::{Child, Command, Stdio};

use tracing::{debug, error};

use crate::errors::ProcessError;
use crate::exec::command::Cmd;
use crate::exec::platform;

/// Platform-side half of a spawned process.
///
/// [`OsSpawner`] wraps a real child; test spawners provide their own.
pub trait ProcessHandle: Send + fmt::Debug {
    /// OS process id (or any stable id for fake processes).
    fn id(&self) -> u32;

    /// Block until the process terminates and classify its exit.
    fn wait(self: Box<Self>) -> Result<(), ProcessError>;
}

/// Owned handle to one spawned process.
#[derive(Debug)]
pub struct Process {
    handle: Box<dyn ProcessHandle>,
}

impl Process {
    pub fn new(handle: impl ProcessHandle + 'static) -> Self {
        Self {
            handle: Box::new(handle),
        }
    }

    pub fn id(&self) -> u32 {
        self.handle.id()
    }

    /// Block until the process exits.
    ///
    /// `Ok(())` only for exit status 0.
    pub fn wait(self) -> Result<(), ProcessError> {
        self.handle.wait()
    }
}

/// Trait abstracting how a [`Cmd`] becomes a running [`Process`].
///
/// Production code uses [`OsSpawner`]; tests can provide an implementation
/// that records commands and simulates their effects.
pub trait Spawner: Send + Sync + fmt::Debug {
    /// Start `cmd` without waiting for it. `cmd` is never empty here;
    /// [`Cmd::spawn_with`] rejects empty commands first.
    fn spawn(&self, cmd: &Cmd) -> Result<Process, ProcessError>;
}

/// Spawns real OS processes with inherited stdio, environment and working
/// directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSpawner;

impl Spawner for OsSpawner {
    fn spawn(&self, cmd: &Cmd) -> Result<Process, ProcessError> {
        let program = cmd.program().ok_or(ProcessError::EmptyCommand)?;

        let child = Command::new(program)
            .args(cmd.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                program: program.to_string(),
                source,
            })?;

        debug!(pid = child.id(), program, "process started");
        Ok(Process::new(OsChild { child }))
    }
}

#[derive(Debug)]
struct OsChild {
    child: Child,
}

impl ProcessHandle for OsChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn wait(mut self: Box<Self>) -> Result<(), ProcessError> {
        let pid = self.child.id();
        let status = self
            .child
            .wait()
            .map_err(|source| ProcessError::WaitFailed { pid, source })?;

        debug!(pid, %status, "process exited");
        platform::check_exit(pid, status)
    }
}

/// Wait for every process, in order, and return the first failure.
///
/// Later processes are still awaited after a failure so that no child is
/// left behind.
pub fn wait_all(processes: impl IntoIterator<Item = Process>) -> Result<(), ProcessError> {
    let mut first_err = None;

    for process in processes {
        let pid = process.id();
        if let Err(err) = process.wait() {
            error!(pid, error = %err, "process failed");
            first_err.get_or_insert(err);
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
