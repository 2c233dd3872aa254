// src/lib.rs

pub mod cli;
pub mod compile;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod target;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::loader::load_and_validate;
use crate::config::model::Manifest;
use crate::errors::TiermakeError;
use crate::exec::Cmd;
use crate::target::TargetMap;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the manifest, registers its targets on the real
/// filesystem and runs the requested subcommand.
pub fn run(args: CliArgs) -> Result<()> {
    let manifest = load_and_validate(&args.manifest)
        .with_context(|| format!("loading manifest {}", args.manifest))?;
    let map = manifest.target_map();
    debug!(manifest = %args.manifest, targets = map.len(), "manifest loaded");

    execute(&manifest, &map, args.command.unwrap_or_default())
}

/// Run one subcommand against an already populated [`TargetMap`].
pub fn execute(manifest: &Manifest, map: &TargetMap, command: Command) -> Result<()> {
    match command {
        Command::Build { targets, force } => {
            let targets = if targets.is_empty() {
                manifest.default_targets()
            } else {
                targets
            };
            build(map, &targets, force)
        }
        Command::Run { args } => {
            build(map, &manifest.default_targets(), false)?;
            let Some(run) = &manifest.build.run else {
                return Err(TiermakeError::ConfigError(
                    "`tiermake run` needs a [build].run command".to_string(),
                )
                .into());
            };
            let mut cmd = Cmd::from(run.clone());
            cmd.append_many(args);
            cmd.run_with(map.spawner())?;
            Ok(())
        }
        Command::Clean => clean(map),
        Command::Status => {
            print_status(map);
            Ok(())
        }
    }
}

fn build(map: &TargetMap, targets: &[String], force: bool) -> Result<()> {
    if force {
        for target in targets {
            map.build(target)?;
        }
    } else {
        map.build_all_if_needed(targets)?;
    }
    Ok(())
}

fn clean(map: &TargetMap) -> Result<()> {
    let fs = map.filesystem();
    let mut removed = 0usize;
    for output in map.outputs() {
        let path = Path::new(output);
        if fs.exists(path) {
            fs.remove_file(path)?;
            println!("removed {output}");
            removed += 1;
        }
    }
    info!(removed, "clean complete");
    Ok(())
}

/// Print every target with its state, dependencies and commands.
fn print_status(map: &TargetMap) {
    println!("targets ({}):", map.len());
    for target in map.iter() {
        let state = if map.needs_rebuild(target.output()) {
            "stale"
        } else {
            "up to date"
        };
        println!("  - {} [{state}]", target.output());
        if !target.dependencies().is_empty() {
            println!("      deps: {:?}", target.dependencies());
        }
        for cmd in target.commands() {
            println!("      cmd: {cmd}");
        }
    }
}
