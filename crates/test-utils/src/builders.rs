#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use tiermake::compile::CompileOptions;
use tiermake::config::{BuildSection, Manifest, TargetConfig};
use tiermake::exec::Cmd;
use tiermake::fs::mock::MockFileSystem;
use tiermake::target::{Target, TargetMap};
use tiermake::types::CompileKind;

use crate::fake_spawner::FakeSpawner;

/// Builder for a [`TargetMap`] on a [`MockFileSystem`] driven by a
/// [`FakeSpawner`].
pub struct TargetMapBuilder {
    fs: MockFileSystem,
    targets: Vec<Target>,
}

impl TargetMapBuilder {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
            targets: Vec::new(),
        }
    }

    /// Create source files on the mock filesystem.
    pub fn with_files(self, paths: &[&str]) -> Self {
        for path in paths {
            self.fs.touch(path);
        }
        self
    }

    /// Target whose single command is `touch <output>`.
    pub fn touch_target(mut self, output: &str, deps: &[&str]) -> Self {
        self.targets.push(Target::new(
            output,
            Cmd::from(["touch", output]),
            deps.iter().copied(),
        ));
        self
    }

    /// Target whose single command exits with code 1.
    pub fn failing_target(mut self, output: &str, deps: &[&str]) -> Self {
        self.targets
            .push(Target::new(output, Cmd::new("false"), deps.iter().copied()));
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Returns the map together with handles on its filesystem and spawner.
    pub fn build(self) -> (TargetMap, MockFileSystem, FakeSpawner) {
        let spawner = FakeSpawner::new(self.fs.clone());
        let mut map = TargetMap::with_backends(Arc::new(self.fs.clone()), Arc::new(spawner.clone()));
        map.extend(self.targets);
        (map, self.fs, spawner)
    }
}

impl Default for TargetMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Manifest` to simplify test setup.
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            manifest: Manifest {
                build: BuildSection::default(),
                compiler: CompileOptions::default(),
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, output: &str, target: TargetConfig) -> Self {
        self.manifest.target.insert(output.to_string(), target);
        self
    }

    pub fn with_default(mut self, output: &str) -> Self {
        self.manifest.build.default.push(output.to_string());
        self
    }

    pub fn with_run(mut self, cmd: &[&str]) -> Self {
        self.manifest.build.run = Some(cmd.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_compiler(mut self, options: CompileOptions) -> Self {
        self.manifest.compiler = options;
        self
    }

    pub fn build(self) -> Manifest {
        self.manifest
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    /// Target produced by a single command.
    pub fn cmd(cmd: &[&str]) -> Self {
        Self {
            target: TargetConfig {
                cmd: Some(cmd.iter().map(|s| s.to_string()).collect()),
                ..TargetConfig::default()
            },
        }
    }

    /// Target produced by `[compiler]`.
    pub fn compile(kind: CompileKind) -> Self {
        Self {
            target: TargetConfig {
                compile: Some(kind),
                ..TargetConfig::default()
            },
        }
    }

    pub fn then(mut self, cmd: &[&str]) -> Self {
        let first = self.target.cmd.take();
        let cmds = self.target.cmds.get_or_insert_with(Vec::new);
        if let Some(first) = first {
            cmds.push(first);
        }
        cmds.push(cmd.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn dep(mut self, dep: &str) -> Self {
        self.target.deps.push(dep.to_string());
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}
