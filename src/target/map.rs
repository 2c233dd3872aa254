// src/target/map.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dag::DependencyGraph;
use crate::exec::{OsSpawner, Spawner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::target::{Artifact, Target};

/// All targets registered for a build session, keyed by output.
///
/// The map also carries the two seams a build needs: the [`FileSystem`] used
/// for staleness checks and the [`Spawner`] used to start commands. Builds
/// borrow the map immutably, so targets cannot change while one is running.
#[derive(Debug)]
pub struct TargetMap {
    pub(crate) targets: BTreeMap<Artifact, Target>,
    pub(crate) fs: Arc<dyn FileSystem>,
    pub(crate) spawner: Arc<dyn Spawner>,
}

impl TargetMap {
    /// Empty map backed by the real filesystem and real processes.
    pub fn new() -> Self {
        Self::with_backends(Arc::new(RealFileSystem), Arc::new(OsSpawner))
    }

    pub fn with_backends(fs: Arc<dyn FileSystem>, spawner: Arc<dyn Spawner>) -> Self {
        Self {
            targets: BTreeMap::new(),
            fs,
            spawner,
        }
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn Spawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// Register a target. A target already registered for the same output is
    /// replaced and returned.
    pub fn insert(&mut self, target: Target) -> Option<Target> {
        let previous = self.targets.insert(target.output().to_string(), target);
        if let Some(prev) = &previous {
            warn!(output = %prev.output(), "target registered twice; keeping the last one");
        }
        previous
    }

    /// Remove the target producing `output`. Returns whether one existed.
    pub fn remove(&mut self, output: &str) -> bool {
        self.targets.remove(output).is_some()
    }

    pub fn get(&self, output: &str) -> Option<&Target> {
        self.targets.get(output)
    }

    pub fn contains(&self, output: &str) -> bool {
        self.targets.contains_key(output)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn filesystem(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn spawner(&self) -> &dyn Spawner {
        self.spawner.as_ref()
    }

    /// Dependency graph over every registered target.
    ///
    /// Each target output becomes a vertex with edges to its dependencies;
    /// a dependency no target produces becomes a leaf vertex. Rebuilt on
    /// every call.
    pub fn dependency_graph(&self) -> DependencyGraph<Artifact> {
        let mut graph = DependencyGraph::new();

        for target in self.targets.values() {
            graph.add_vertex(
                target.output().to_string(),
                target.dependencies().iter().cloned(),
            );
        }
        for target in self.targets.values() {
            for dep in target.dependencies() {
                graph.add_leaf(dep.clone());
            }
        }

        debug!(vertices = graph.len(), "dependency graph built");
        graph
    }
}

impl Default for TargetMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Target> for TargetMap {
    fn extend<I: IntoIterator<Item = Target>>(&mut self, iter: I) {
        for target in iter {
            self.insert(target);
        }
    }
}
