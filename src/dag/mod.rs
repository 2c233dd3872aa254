// src/dag/mod.rs

//! Dependency graph and leveling.
//!
//! - [`graph`] holds a generic vertex -> dependencies mapping and computes
//!   longest-path levels from a set of roots, reporting cycles and unknown
//!   vertices on the way.

pub mod graph;

pub use graph::{DependencyGraph, GraphError, Levels};
