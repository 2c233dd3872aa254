// tests/leveled_build.rs

mod common;
use crate::common::builders::TargetMapBuilder;
use crate::common::fake_spawner::Event;
use crate::common::init_tracing;

use std::error::Error;
use std::path::Path;

use tiermake::errors::{BuildError, ProcessError};
use tiermake::exec::Cmd;
use tiermake::fs::FileSystem;
use tiermake::target::Target;

type TestResult = Result<(), Box<dyn Error>>;

/// main.c -> main.o \
///                   -> app
/// util.c -> util.o /
fn two_objects_and_app() -> TargetMapBuilder {
    TargetMapBuilder::new()
        .with_files(&["main.c", "util.c"])
        .touch_target("main.o", &["main.c"])
        .touch_target("util.o", &["util.c"])
        .touch_target("app", &["main.o", "util.o"])
}

fn spawned(cmd: &str) -> Event {
    Event::Spawned(cmd.to_string())
}

fn exited(cmd: &str) -> Event {
    Event::Exited(cmd.to_string())
}

#[test]
fn fresh_build_runs_levels_deepest_first() -> TestResult {
    init_tracing();
    let (map, fs, spawner) = two_objects_and_app().build();

    map.build_if_needed("app")?;

    assert_eq!(
        spawner.spawned(),
        ["touch main.o", "touch util.o", "touch app"]
    );
    assert!(fs.exists(Path::new("app")));
    assert!(!map.needs_rebuild("app"));
    Ok(())
}

#[test]
fn targets_of_one_level_start_before_any_is_awaited() -> TestResult {
    init_tracing();
    let (map, _fs, spawner) = two_objects_and_app().build();

    map.build_if_needed("app")?;

    assert_eq!(
        spawner.journal(),
        [
            spawned("touch main.o"),
            spawned("touch util.o"),
            exited("touch main.o"),
            exited("touch util.o"),
            spawned("touch app"),
            exited("touch app"),
        ]
    );
    Ok(())
}

#[test]
fn second_build_spawns_nothing() -> TestResult {
    init_tracing();
    let (map, _fs, spawner) = two_objects_and_app().build();

    map.build_if_needed("app")?;
    spawner.clear();
    map.build_if_needed("app")?;

    assert_eq!(spawner.spawn_count(), 0);
    Ok(())
}

#[test]
fn touching_a_source_rebuilds_only_its_chain() -> TestResult {
    init_tracing();
    let (map, fs, spawner) = two_objects_and_app().build();

    map.build_if_needed("app")?;
    spawner.clear();
    fs.touch("main.c");
    map.build_if_needed("app")?;

    assert_eq!(spawner.spawned(), ["touch main.o", "touch app"]);
    Ok(())
}

#[test]
fn deleted_intermediate_is_rebuilt_with_its_parent() -> TestResult {
    init_tracing();
    let (map, fs, spawner) = two_objects_and_app().build();

    map.build_if_needed("app")?;
    spawner.clear();
    fs.remove("util.o");
    map.build_if_needed("app")?;

    assert_eq!(spawner.spawned(), ["touch util.o", "touch app"]);
    Ok(())
}

#[test]
fn shortcut_edge_places_target_at_longest_distance() -> TestResult {
    init_tracing();
    // app depends on lib.a directly and through wrap.o; lib.a must finish
    // before wrap.o starts.
    let (map, _fs, spawner) = TargetMapBuilder::new()
        .with_files(&["lib.c"])
        .touch_target("lib.a", &["lib.c"])
        .touch_target("wrap.o", &["lib.a"])
        .touch_target("app", &["lib.a", "wrap.o"])
        .build();

    map.build_if_needed("app")?;

    assert_eq!(
        spawner.spawned(),
        ["touch lib.a", "touch wrap.o", "touch app"]
    );
    let lib_done = spawner.position(&exited("touch lib.a")).unwrap();
    let wrap_started = spawner.position(&spawned("touch wrap.o")).unwrap();
    assert!(lib_done < wrap_started);
    Ok(())
}

#[test]
fn failing_command_stops_the_build_at_its_level() {
    init_tracing();
    let (map, fs, spawner) = TargetMapBuilder::new()
        .with_files(&["src"])
        .failing_target("a", &["src"])
        .touch_target("b", &["src"])
        .touch_target("top", &["a", "b"])
        .build();

    let err = map.build_if_needed("top").unwrap_err();

    match err {
        BuildError::CommandFailed {
            target,
            source: ProcessError::NonZeroExit { code: 1, .. },
        } => assert_eq!(target, "a"),
        other => panic!("unexpected error: {other:?}"),
    }
    // The sibling was already running and is still awaited.
    assert!(spawner.journal().contains(&exited("touch b")));
    assert!(fs.exists(Path::new("b")));
    // Nothing of the level above starts.
    assert!(!spawner.spawned().contains(&"touch top".to_string()));
    assert!(!fs.exists(Path::new("top")));
}

#[test]
fn spawn_failure_is_reported_for_its_target() {
    init_tracing();
    let (map, _fs, spawner) = TargetMapBuilder::new()
        .with_files(&["main.c"])
        .target(Target::new(
            "main.o",
            Cmd::from(["cc", "-c", "main.c"]),
            ["main.c"],
        ))
        .build();

    let err = map.build_if_needed("main.o").unwrap_err();

    assert!(matches!(
        err,
        BuildError::CommandFailed {
            ref target,
            source: ProcessError::SpawnFailed { ref program, .. },
        } if target == "main.o" && program == "cc"
    ));
    assert_eq!(spawner.spawn_count(), 0);
}

#[test]
fn missing_source_fails_before_anything_runs() {
    init_tracing();
    let (map, _fs, spawner) = TargetMapBuilder::new()
        .with_files(&["main.c"])
        .touch_target("main.o", &["main.c"])
        .touch_target("gen.o", &["gen.c"])
        .touch_target("app", &["main.o", "gen.o"])
        .build();

    let err = map.build_if_needed("app").unwrap_err();

    assert!(matches!(err, BuildError::NoRuleForTarget(ref a) if a == "gen.c"));
    assert_eq!(err.artifact(), "gen.c");
    assert_eq!(spawner.spawn_count(), 0);
}

#[test]
fn unknown_missing_output_has_no_rule() {
    init_tracing();
    let (map, _fs, spawner) = two_objects_and_app().build();

    let err = map.build_if_needed("nothing-makes-this").unwrap_err();

    assert!(matches!(err, BuildError::NoRuleForTarget(ref a) if a == "nothing-makes-this"));
    assert_eq!(spawner.spawn_count(), 0);
}

#[test]
fn existing_plain_file_needs_no_build() -> TestResult {
    init_tracing();
    let (map, _fs, spawner) = two_objects_and_app().build();

    map.build_if_needed("main.c")?;

    assert_eq!(spawner.spawn_count(), 0);
    Ok(())
}

#[test]
fn cycle_is_reported_and_nothing_runs() {
    init_tracing();
    let (map, _fs, spawner) = TargetMapBuilder::new()
        .touch_target("x", &["y"])
        .touch_target("y", &["x"])
        .build();

    let err = map.build_if_needed("x").unwrap_err();

    assert!(matches!(err, BuildError::CyclicDependency(ref v) if v == "x" || v == "y"));
    assert_eq!(spawner.spawn_count(), 0);
}

#[test]
fn target_commands_run_as_a_chain() -> TestResult {
    init_tracing();
    let (map, _fs, spawner) = TargetMapBuilder::new()
        .with_files(&["gen.def"])
        .target(Target::with_commands(
            "gen.h",
            [Cmd::from(["touch", "gen.tmp"]), Cmd::from(["touch", "gen.h"])],
            ["gen.def"],
        ))
        .touch_target("user.o", &["gen.h"])
        .build();

    map.build_if_needed("user.o")?;

    assert_eq!(
        spawner.journal(),
        [
            spawned("touch gen.tmp"),
            exited("touch gen.tmp"),
            spawned("touch gen.h"),
            exited("touch gen.h"),
            spawned("touch user.o"),
            exited("touch user.o"),
        ]
    );
    Ok(())
}

#[test]
fn failed_batch_starts_no_follow_up_commands() {
    init_tracing();
    let (map, fs, spawner) = TargetMapBuilder::new()
        .with_files(&["src"])
        .target(Target::with_commands(
            "p",
            [Cmd::new("false"), Cmd::from(["touch", "p"])],
            ["src"],
        ))
        .target(Target::with_commands(
            "q",
            [Cmd::new("true"), Cmd::from(["touch", "q"])],
            ["src"],
        ))
        .touch_target("all", &["p", "q"])
        .build();

    let err = map.build_if_needed("all").unwrap_err();

    assert_eq!(err.artifact(), "p");
    assert_eq!(spawner.spawned(), ["false", "true"]);
    assert!(spawner.journal().contains(&exited("true")));
    assert!(!fs.exists(Path::new("q")));
}

#[test]
fn target_without_commands_fails() {
    init_tracing();
    let (map, _fs, _spawner) = TargetMapBuilder::new()
        .with_files(&["src"])
        .target(Target::with_commands("empty", Vec::<Cmd>::new(), ["src"]))
        .build();

    let err = map.build_if_needed("empty").unwrap_err();

    assert!(matches!(
        err,
        BuildError::CommandFailed {
            source: ProcessError::EmptyCommand,
            ..
        }
    ));
}

#[test]
fn several_roots_share_one_pass() -> TestResult {
    init_tracing();
    let (map, _fs, spawner) = TargetMapBuilder::new()
        .with_files(&["common.c", "a.c", "b.c"])
        .touch_target("common.o", &["common.c"])
        .touch_target("a", &["a.c", "common.o"])
        .touch_target("b", &["b.c", "common.o"])
        .build();

    map.build_all_if_needed(&["a", "b"])?;

    assert_eq!(spawner.spawned(), ["touch common.o", "touch a", "touch b"]);
    assert_eq!(
        spawner.position(&spawned("touch b")),
        Some(3),
        "a and b start together once common.o is done"
    );
    Ok(())
}

#[test]
fn up_to_date_roots_are_skipped() -> TestResult {
    init_tracing();
    let (map, fs, spawner) = TargetMapBuilder::new()
        .with_files(&["a.c", "b.c"])
        .touch_target("a", &["a.c"])
        .touch_target("b", &["b.c"])
        .build();

    map.build_all_if_needed(&["a", "b"])?;
    spawner.clear();
    fs.touch("b.c");
    map.build_all_if_needed(&["a", "b"])?;

    assert_eq!(spawner.spawned(), ["touch b"]);
    Ok(())
}
