// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] holds [`Cmd`], the ordered argument list describing one
//!   external invocation.
//! - [`process`] owns spawned processes and the [`Spawner`] trait used to
//!   create them. Production code goes through [`OsSpawner`]; tests can plug
//!   in a spawner that never touches the OS.
//! - `unix` / `windows` translate a platform exit status into
//!   [`crate::errors::ProcessError`].

pub mod command;
pub mod process;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as platform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as platform;

pub use command::Cmd;
pub use process::{wait_all, OsSpawner, Process, ProcessHandle, Spawner};
