use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tiermake::errors::ProcessError;
use tiermake::exec::{Cmd, OsSpawner, Process, ProcessHandle, Spawner};
use tiermake::fs::mock::MockFileSystem;

/// What happened to a fake process, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The rendered command line was spawned.
    Spawned(String),
    /// The process for this command line was awaited.
    Exited(String),
}

/// A spawner that never starts an OS process.
///
/// Known programs act on the shared [`MockFileSystem`] when their process is
/// awaited:
/// - `touch ARGS...` touches every argument and succeeds
/// - `true` succeeds
/// - `false` exits with code 1
///
/// Any other program fails to spawn. Every spawn and every wait is recorded
/// in a journal shared by all clones.
#[derive(Debug, Clone)]
pub struct FakeSpawner {
    fs: MockFileSystem,
    journal: Arc<Mutex<Vec<Event>>>,
    next_pid: Arc<AtomicU32>,
}

impl FakeSpawner {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            journal: Arc::new(Mutex::new(Vec::new())),
            next_pid: Arc::new(AtomicU32::new(1000)),
        }
    }

    pub fn journal(&self) -> Vec<Event> {
        self.journal.lock().unwrap().clone()
    }

    /// Command lines spawned so far, in spawn order.
    pub fn spawned(&self) -> Vec<String> {
        self.journal()
            .into_iter()
            .filter_map(|event| match event {
                Event::Spawned(cmd) => Some(cmd),
                Event::Exited(_) => None,
            })
            .collect()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned().len()
    }

    pub fn clear(&self) {
        self.journal.lock().unwrap().clear();
    }

    /// Position of an event in the journal.
    pub fn position(&self, event: &Event) -> Option<usize> {
        self.journal().iter().position(|e| e == event)
    }
}

impl Spawner for FakeSpawner {
    fn spawn(&self, cmd: &Cmd) -> Result<Process, ProcessError> {
        let program = cmd.program().unwrap_or_default().to_string();
        if !matches!(program.as_str(), "touch" | "true" | "false") {
            return Err(ProcessError::SpawnFailed {
                program,
                source: io::Error::new(io::ErrorKind::NotFound, "unknown fake program"),
            });
        }

        self.journal
            .lock()
            .unwrap()
            .push(Event::Spawned(cmd.to_string()));

        Ok(Process::new(FakeProcess {
            pid: self.next_pid.fetch_add(1, Ordering::SeqCst),
            cmd: cmd.clone(),
            fs: self.fs.clone(),
            journal: Arc::clone(&self.journal),
        }))
    }
}

#[derive(Debug)]
struct FakeProcess {
    pid: u32,
    cmd: Cmd,
    fs: MockFileSystem,
    journal: Arc<Mutex<Vec<Event>>>,
}

impl ProcessHandle for FakeProcess {
    fn id(&self) -> u32 {
        self.pid
    }

    fn wait(self: Box<Self>) -> Result<(), ProcessError> {
        self.journal
            .lock()
            .unwrap()
            .push(Event::Exited(self.cmd.to_string()));

        match self.cmd.program() {
            Some("touch") => {
                for path in self.cmd.args() {
                    self.fs.touch(path);
                }
                Ok(())
            }
            Some("false") => Err(ProcessError::NonZeroExit {
                pid: self.pid,
                code: 1,
            }),
            _ => Ok(()),
        }
    }
}

/// Real OS spawner that counts how many processes it started.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpawner {
    spawned: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }
}

impl Spawner for RecordingSpawner {
    fn spawn(&self, cmd: &Cmd) -> Result<Process, ProcessError> {
        let process = OsSpawner.spawn(cmd)?;
        self.spawned.lock().unwrap().push(cmd.to_string());
        Ok(process)
    }
}
