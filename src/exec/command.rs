// src/exec/command.rs

//! [`Cmd`]: one external invocation as an ordered list of arguments.

use std::fmt;

use tracing::info;

use crate::errors::ProcessError;
use crate::exec::process::{OsSpawner, Process, Spawner};

/// Ordered argument list; the first item names the program.
///
/// Built by appending items, then handed to a [`crate::target::Target`],
/// which never exposes it mutably again.
///
/// ```
/// use tiermake::exec::Cmd;
///
/// let mut cmd = Cmd::new("cc");
/// cmd.append("-c")
///     .append_many_prefixed("-I", ["include", "vendor"])
///     .append_many(["-o", "main.o", "main.c"]);
///
/// assert_eq!(cmd.to_string(), "cc -c -Iinclude -Ivendor -o main.o main.c");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cmd {
    items: Vec<String>,
}

impl Cmd {
    /// Start a command with the program name.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            items: vec![program.into()],
        }
    }

    /// A command with no items at all. Spawning it fails with
    /// [`ProcessError::EmptyCommand`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn append(&mut self, item: impl Into<String>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    pub fn append_many<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Append `prefix + item` for every item, e.g. `-I` + include path.
    pub fn append_many_prefixed<I, S>(&mut self, prefix: &str, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.items
            .extend(items.into_iter().map(|item| format!("{prefix}{}", item.as_ref())));
        self
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn program(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.items.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Spawn the command through the OS and return without waiting.
    pub fn spawn_async(&self) -> Result<Process, ProcessError> {
        self.spawn_with(&OsSpawner)
    }

    /// Spawn through the given [`Spawner`].
    ///
    /// The rendered command line is logged before anything is started.
    pub fn spawn_with(&self, spawner: &dyn Spawner) -> Result<Process, ProcessError> {
        if self.items.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        info!(cmd = %self, "running command");
        spawner.spawn(self)
    }

    /// Spawn and immediately wait.
    pub fn run(&self) -> Result<(), ProcessError> {
        self.run_with(&OsSpawner)
    }

    pub fn run_with(&self, spawner: &dyn Spawner) -> Result<(), ProcessError> {
        self.spawn_with(spawner)?.wait()
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in &self.items {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            f.write_str(item)?;
        }
        Ok(())
    }
}

impl From<&str> for Cmd {
    fn from(program: &str) -> Self {
        Cmd::new(program)
    }
}

impl From<Vec<String>> for Cmd {
    fn from(items: Vec<String>) -> Self {
        Self { items }
    }
}

impl From<&[&str]> for Cmd {
    fn from(items: &[&str]) -> Self {
        items.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Cmd {
    fn from(items: [&str; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Cmd {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}
