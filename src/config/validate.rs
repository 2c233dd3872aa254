// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{Manifest, TargetConfig};
use crate::errors::{Result, TiermakeError};
use crate::types::CompileKind;

/// Run semantic validation against a loaded manifest.
///
/// This checks:
/// - there is at least one target
/// - every target has exactly one of `cmd`, `cmds`, `compile`, and no empty
///   command
/// - `compile = "object"` targets have exactly one dependency
/// - no target depends on itself
/// - `[build].default` only names registered targets, `[build].run` is not
///   empty
/// - the dependencies between registered targets have no cycles
///
/// Dependencies that no target produces are allowed; they are source files
/// checked for existence at build time.
pub fn validate_manifest(manifest: &Manifest) -> Result<()> {
    ensure_has_targets(manifest)?;
    validate_build_section(manifest)?;
    for (output, target) in manifest.target.iter() {
        validate_target(output, target)?;
    }
    validate_dag(manifest)?;
    Ok(())
}

fn config_error(msg: String) -> TiermakeError {
    TiermakeError::ConfigError(msg)
}

fn ensure_has_targets(manifest: &Manifest) -> Result<()> {
    if manifest.target.is_empty() {
        return Err(config_error(
            "manifest must contain at least one [target.\"<output>\"] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_build_section(manifest: &Manifest) -> Result<()> {
    for name in manifest.build.default.iter() {
        if !manifest.target.contains_key(name) {
            return Err(config_error(format!(
                "[build].default names unknown target '{name}'"
            )));
        }
    }

    if let Some(run) = &manifest.build.run {
        if run.is_empty() {
            return Err(config_error("[build].run must not be empty".to_string()));
        }
    }

    Ok(())
}

fn validate_target(output: &str, target: &TargetConfig) -> Result<()> {
    let configured = [
        target.cmd.is_some(),
        target.cmds.is_some(),
        target.compile.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();

    if configured != 1 {
        return Err(config_error(format!(
            "target '{output}' must set exactly one of `cmd`, `cmds` or `compile`"
        )));
    }

    if target.cmd.as_ref().is_some_and(Vec::is_empty) {
        return Err(config_error(format!("target '{output}' has an empty `cmd`")));
    }

    if let Some(cmds) = &target.cmds {
        if cmds.is_empty() || cmds.iter().any(Vec::is_empty) {
            return Err(config_error(format!(
                "target '{output}' has an empty entry in `cmds`"
            )));
        }
    }

    match target.compile {
        Some(CompileKind::Object) if target.deps.len() != 1 => {
            return Err(config_error(format!(
                "object target '{output}' needs exactly one dependency (its source), got {}",
                target.deps.len()
            )));
        }
        Some(CompileKind::Executable) if target.deps.is_empty() => {
            return Err(config_error(format!(
                "executable target '{output}' needs at least one dependency"
            )));
        }
        _ => {}
    }

    if target.deps.iter().any(|dep| dep == output) {
        return Err(config_error(format!(
            "target '{output}' cannot depend on itself"
        )));
    }

    Ok(())
}

fn validate_dag(manifest: &Manifest) -> Result<()> {
    // Edge direction: dependency -> dependent, only between registered
    // targets. Plain source files cannot take part in a cycle.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for output in manifest.target.keys() {
        graph.add_node(output.as_str());
    }

    for (output, target) in manifest.target.iter() {
        for dep in target.deps.iter() {
            if manifest.target.contains_key(dep) {
                graph.add_edge(dep.as_str(), output.as_str(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(TiermakeError::TargetCycle(format!(
            "cycle detected between targets involving '{}'",
            cycle.node_id()
        ))),
    }
}
