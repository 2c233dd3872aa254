// src/config/mod.rs

//! Manifest loading and validation for the `tiermake` driver.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a manifest from disk (`loader.rs`).
//! - Validate invariants like acyclic target dependencies (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{BuildSection, Manifest, TargetConfig};
pub use validate::validate_manifest;
