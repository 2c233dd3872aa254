// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::compile::CompileOptions;
use crate::exec::Cmd;
use crate::target::{Target, TargetMap};
use crate::types::CompileKind;

/// Top-level manifest as read from a TOML file.
///
/// ```toml
/// [build]
/// default = ["build/app"]
/// run = ["./build/app"]
///
/// [compiler]
/// compiler = "g++"
/// standard = "c++20"
/// flags = ["-Wall"]
///
/// [target."build/main.o"]
/// compile = "object"
/// deps = ["src/main.cpp"]
///
/// [target."build/app"]
/// compile = "executable"
/// deps = ["build/main.o"]
/// ```
///
/// Artifact paths are used verbatim, so relative paths resolve against the
/// working directory of the process.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Driver behaviour from `[build]`.
    #[serde(default)]
    pub build: BuildSection,

    /// Compiler settings used by `compile = "..."` targets.
    #[serde(default)]
    pub compiler: CompileOptions,

    /// All targets from `[target."<output>"]`, keyed by output path.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildSection {
    /// Targets built when none are named on the command line. Empty means
    /// every target.
    #[serde(default)]
    pub default: Vec<String>,

    /// Command started by `tiermake run` once the defaults are built.
    #[serde(default)]
    pub run: Option<Vec<String>>,
}

/// `[target."<output>"]` section.
///
/// Exactly one of `cmd`, `cmds` or `compile` must be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Artifacts this target depends on: other targets' outputs or plain
    /// files that must exist.
    #[serde(default)]
    pub deps: Vec<String>,

    /// Single command producing the output.
    #[serde(default)]
    pub cmd: Option<Vec<String>>,

    /// Several commands run in order.
    #[serde(default)]
    pub cmds: Option<Vec<Vec<String>>>,

    /// Let `[compiler]` build the command from `deps`.
    #[serde(default)]
    pub compile: Option<CompileKind>,
}

impl TargetConfig {
    /// Commands producing `output`.
    ///
    /// Assumes a validated manifest; an unconfigured target yields no
    /// commands.
    pub fn commands(&self, output: &str, options: &CompileOptions) -> Vec<Cmd> {
        if let Some(cmd) = &self.cmd {
            return vec![Cmd::from(cmd.clone())];
        }
        if let Some(cmds) = &self.cmds {
            return cmds.iter().cloned().map(Cmd::from).collect();
        }
        match (self.compile, self.deps.first()) {
            (Some(CompileKind::Object), Some(source)) => vec![options.object_cmd(output, source)],
            (Some(CompileKind::Executable), _) => {
                vec![options.executable_cmd(output, self.deps.iter().cloned())]
            }
            _ => Vec::new(),
        }
    }
}

impl Manifest {
    /// Every configured target, in output order.
    pub fn targets(&self) -> Vec<Target> {
        self.target
            .iter()
            .map(|(output, tc)| {
                Target::with_commands(
                    output.clone(),
                    tc.commands(output, &self.compiler),
                    tc.deps.iter().cloned(),
                )
            })
            .collect()
    }

    /// A [`TargetMap`] on the real filesystem holding every target.
    pub fn target_map(&self) -> TargetMap {
        let mut map = TargetMap::new();
        map.extend(self.targets());
        map
    }

    /// Targets to build when none were requested explicitly.
    pub fn default_targets(&self) -> Vec<String> {
        if self.build.default.is_empty() {
            self.target.keys().cloned().collect()
        } else {
            self.build.default.clone()
        }
    }
}
