// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, SystemTime>,
    /// Logical clock in seconds since the epoch; bumped on every write.
    clock: u64,
}

/// In-memory filesystem with a logical clock.
///
/// Every [`MockFileSystem::touch`] stamps the file with a strictly later
/// time than any previous write, so tests never depend on the timestamp
/// resolution of the host filesystem. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update `path` with a fresh timestamp.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(state.clock);
        state.files.insert(path.as_ref().to_path_buf(), stamp);
    }

    /// Set an explicit modification time.
    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(path.as_ref().to_path_buf(), time);
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        let mut state = self.state.lock().unwrap();
        state.files.remove(path.as_ref()).is_some()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        let mut paths: Vec<PathBuf> = state.files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.state.lock().unwrap().files.get(path).copied()
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if self.remove(path) {
            Ok(())
        } else {
            Err(anyhow!("file not found: {:?}", path))
        }
    }
}
