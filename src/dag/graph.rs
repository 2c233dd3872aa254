// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

/// Error produced by [`DependencyGraph::level`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError<V> {
    /// A back-edge was found; the vertex is the one reached twice on the
    /// current path.
    #[error("cycle detected at vertex '{0}'")]
    CycleDetected(V),

    /// A dependency names a vertex the graph does not contain.
    #[error("vertex '{0}' not found")]
    VertexNotFound(V),
}

/// Vertices grouped by their longest-path distance from the roots.
///
/// `levels[0]` holds the roots; deeper levels hold dependencies. Every
/// dependency of a vertex sits at a strictly larger index than the vertex
/// itself, so walking from the deepest level back to 0 always runs
/// dependencies first. Order inside one level is not meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Levels<V> {
    levels: Vec<Vec<V>>,
}

impl<V> Levels<V> {
    /// Number of levels (deepest index + 1).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, level: usize) -> Option<&[V]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// Levels from 0 (roots) to the deepest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &[V]> {
        self.levels.iter().map(Vec::as_slice)
    }

    /// Levels in execution order: deepest first, roots last.
    pub fn deepest_first(&self) -> impl Iterator<Item = (usize, &[V])> {
        self.levels
            .iter()
            .enumerate()
            .rev()
            .map(|(i, vertices)| (i, vertices.as_slice()))
    }

    pub fn vertex_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn into_inner(self) -> Vec<Vec<V>> {
        self.levels
    }
}

impl<V: PartialEq> Levels<V> {
    pub fn level_of(&self, vertex: &V) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.iter().any(|v| v == vertex))
    }
}

/// Mapping from vertex to the vertices it depends on.
///
/// Vertices live in an arena addressed by index; the traversal state is kept
/// in a separate vector of the same length, so nothing borrows into the graph
/// while it is being walked.
#[derive(Debug, Clone)]
pub struct DependencyGraph<V> {
    vertices: Vec<V>,
    deps: Vec<Vec<V>>,
    index: HashMap<V, usize>,
}

impl<V> Default for DependencyGraph<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            deps: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// Per-vertex traversal state.
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    /// On the current DFS path.
    visiting: bool,
    level: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    depth: usize,
    next_dep: usize,
}

impl<V> DependencyGraph<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `vertex` with its dependencies. Re-adding a vertex replaces its
    /// dependency list.
    pub fn add_vertex(&mut self, vertex: V, deps: impl IntoIterator<Item = V>) {
        let deps: Vec<V> = deps.into_iter().collect();
        match self.index.get(&vertex) {
            Some(&idx) => self.deps[idx] = deps,
            None => {
                self.index.insert(vertex.clone(), self.vertices.len());
                self.vertices.push(vertex);
                self.deps.push(deps);
            }
        }
    }

    /// Insert `vertex` without dependencies unless it is already present.
    pub fn add_leaf(&mut self, vertex: V) {
        if !self.index.contains_key(&vertex) {
            self.add_vertex(vertex, []);
        }
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    pub fn dependencies_of(&self, vertex: &V) -> Option<&[V]> {
        self.index.get(vertex).map(|&idx| self.deps[idx].as_slice())
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Assign every vertex reachable from `roots` its longest-path distance
    /// from them. All roots start at level 0.
    ///
    /// Fails with [`GraphError::CycleDetected`] when a vertex is reached again
    /// while still on the current path, and with
    /// [`GraphError::VertexNotFound`] when a root or a dependency is not in
    /// the graph.
    pub fn level(&self, roots: &[V]) -> Result<Levels<V>, GraphError<V>> {
        let mut slots = vec![Slot::default(); self.vertices.len()];
        let mut deepest = 0;

        for root in roots {
            let idx = self.index_of(root)?;
            self.descend(idx, &mut slots, &mut deepest)?;
        }

        let mut levels: Vec<Vec<V>> = if roots.is_empty() {
            Vec::new()
        } else {
            vec![Vec::new(); deepest + 1]
        };
        for (idx, slot) in slots.iter().enumerate() {
            if let Some(level) = slot.level {
                levels[level].push(self.vertices[idx].clone());
            }
        }

        Ok(Levels { levels })
    }

    fn index_of(&self, vertex: &V) -> Result<usize, GraphError<V>> {
        self.index
            .get(vertex)
            .copied()
            .ok_or_else(|| GraphError::VertexNotFound(vertex.clone()))
    }

    /// Depth-first walk from `root` with an explicit stack.
    fn descend(
        &self,
        root: usize,
        slots: &mut [Slot],
        deepest: &mut usize,
    ) -> Result<(), GraphError<V>> {
        let mut stack = Vec::new();
        if self.enter(root, 0, slots, deepest)? {
            stack.push(Frame {
                vertex: root,
                depth: 0,
                next_dep: 0,
            });
        }

        while let Some(top) = stack.len().checked_sub(1) {
            let Frame {
                vertex,
                depth,
                next_dep,
            } = stack[top];

            match self.deps[vertex].get(next_dep) {
                Some(dep) => {
                    stack[top].next_dep += 1;
                    let dep = self.index_of(dep)?;
                    if self.enter(dep, depth + 1, slots, deepest)? {
                        stack.push(Frame {
                            vertex: dep,
                            depth: depth + 1,
                            next_dep: 0,
                        });
                    }
                }
                None => {
                    slots[vertex].visiting = false;
                    stack.pop();
                }
            }
        }

        Ok(())
    }

    /// Enter `vertex` at `depth`. Returns whether its dependencies need to be
    /// (re)visited.
    ///
    /// A vertex already settled at `depth` or deeper is skipped: its subtree
    /// was explored at least that deep, and any cycle below it would already
    /// have been reported.
    fn enter(
        &self,
        vertex: usize,
        depth: usize,
        slots: &mut [Slot],
        deepest: &mut usize,
    ) -> Result<bool, GraphError<V>> {
        let slot = &mut slots[vertex];
        if slot.visiting {
            return Err(GraphError::CycleDetected(self.vertices[vertex].clone()));
        }
        if slot.level.is_some_and(|level| level >= depth) {
            return Ok(false);
        }

        slot.level = Some(depth);
        slot.visiting = true;
        *deepest = (*deepest).max(depth);
        Ok(true)
    }
}

impl<V> FromIterator<(V, Vec<V>)> for DependencyGraph<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    fn from_iter<I: IntoIterator<Item = (V, Vec<V>)>>(iter: I) -> Self {
        let mut graph = DependencyGraph::new();
        for (vertex, deps) in iter {
            graph.add_vertex(vertex, deps);
        }
        graph
    }
}
