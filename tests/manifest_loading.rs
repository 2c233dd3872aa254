// tests/manifest_loading.rs

mod common;
use crate::common::builders::{ManifestBuilder, TargetConfigBuilder};

use std::io::Write;

use tempfile::NamedTempFile;
use tiermake::config::{load_and_validate, load_from_path, validate_manifest};
use tiermake::errors::TiermakeError;
use tiermake::types::{CompileKind, Compiler};

fn manifest_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_manifest_becomes_targets() {
    let file = manifest_file(
        r#"
[build]
default = ["build/app"]
run = ["./build/app", "--fast"]

[compiler]
compiler = "g++"
standard = "c++20"
flags = ["-Wall"]
include_paths = ["include"]

[target."build/main.o"]
compile = "object"
deps = ["src/main.cpp"]

[target."build/app"]
compile = "executable"
deps = ["build/main.o"]

[target."docs/index.html"]
cmds = [["mkdir", "-p", "docs"], ["pandoc", "README.md", "-o", "docs/index.html"]]
deps = ["README.md"]
"#,
    );

    let manifest = load_and_validate(file.path()).unwrap();
    assert_eq!(manifest.compiler.compiler, Compiler::Gxx);
    assert_eq!(manifest.default_targets(), ["build/app"]);

    let map = manifest.target_map();
    assert_eq!(map.len(), 3);

    let obj = map.get("build/main.o").unwrap();
    assert_eq!(
        obj.commands()[0].to_string(),
        "g++ -std=c++20 -Wall -Iinclude -c -o build/main.o src/main.cpp"
    );

    let app = map.get("build/app").unwrap();
    assert_eq!(
        app.commands()[0].to_string(),
        "g++ -std=c++20 -Wall -Iinclude -o build/app build/main.o"
    );

    let docs = map.get("docs/index.html").unwrap();
    assert_eq!(docs.commands().len(), 2);
    assert_eq!(docs.dependencies(), ["README.md"]);
}

#[test]
fn defaults_fall_back_to_every_target() {
    let manifest = ManifestBuilder::new()
        .with_target("b", TargetConfigBuilder::cmd(&["touch", "b"]).build())
        .with_target("a", TargetConfigBuilder::cmd(&["touch", "a"]).build())
        .build();

    validate_manifest(&manifest).unwrap();
    assert_eq!(manifest.default_targets(), ["a", "b"]);
}

#[test]
fn unknown_keys_are_rejected_when_parsing() {
    let file = manifest_file(
        r#"
[target."a"]
cmd = ["touch", "a"]
after = ["b"]
"#,
    );

    let result = load_from_path(file.path());
    assert!(matches!(result, Err(TiermakeError::TomlError(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("Tiermake.toml"));
    assert!(matches!(result, Err(TiermakeError::IoError(_))));
}

#[test]
fn empty_manifest_is_rejected() {
    let file = manifest_file("[build]\n");

    match load_and_validate(file.path()) {
        Err(TiermakeError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn self_dependency_is_rejected() {
    let manifest = ManifestBuilder::new()
        .with_target(
            "a",
            TargetConfigBuilder::cmd(&["touch", "a"]).dep("a").build(),
        )
        .build();

    match validate_manifest(&manifest) {
        Err(TiermakeError::ConfigError(msg)) => assert!(msg.contains("itself")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn empty_command_in_chain_is_rejected() {
    let manifest = ManifestBuilder::new()
        .with_target(
            "a",
            TargetConfigBuilder::cmd(&["mkdir", "out"]).then(&[]).build(),
        )
        .build();

    match validate_manifest(&manifest) {
        Err(TiermakeError::ConfigError(msg)) => assert!(msg.contains("empty")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn executable_without_inputs_is_rejected() {
    let manifest = ManifestBuilder::new()
        .with_target(
            "app",
            TargetConfigBuilder::compile(CompileKind::Executable).build(),
        )
        .build();

    assert!(matches!(
        validate_manifest(&manifest),
        Err(TiermakeError::ConfigError(_))
    ));
}

#[test]
fn cycle_between_targets_returns_structured_error() {
    let file = manifest_file(
        r#"
[target."a"]
cmd = ["touch", "a"]
deps = ["b"]

[target."b"]
cmd = ["touch", "b"]
deps = ["a"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TiermakeError::TargetCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains('a') || msg.contains('b'));
        }
        other => panic!("Expected TargetCycle error, got: {other:?}"),
    }
}

#[test]
fn empty_run_command_is_rejected() {
    let manifest = ManifestBuilder::new()
        .with_target("a", TargetConfigBuilder::cmd(&["touch", "a"]).build())
        .with_run(&[])
        .build();

    assert!(matches!(
        validate_manifest(&manifest),
        Err(TiermakeError::ConfigError(_))
    ));
}
