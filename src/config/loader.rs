// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::Manifest;
use crate::config::validate::validate_manifest;
use crate::errors::Result;

/// Default manifest file name, looked up in the working directory.
pub const DEFAULT_MANIFEST: &str = "Tiermake.toml";

/// Load a manifest from a given path without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Manifest> {
    let contents = fs::read_to_string(path.as_ref())?;
    let manifest: Manifest = toml::from_str(&contents)?;
    Ok(manifest)
}

/// Load a manifest and validate it.
///
/// This is the recommended entry point for the driver:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks target commands, default targets and the absence of
///   dependency cycles between targets.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Manifest> {
    let manifest = load_from_path(&path)?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

pub fn default_manifest_path() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST)
}
