//! Integration tests for the layer build pipeline on real scratch trees.
//!
//! These tests run the pipeline with `useDocker` disabled and only empty
//! or missing manifests, so no external installer is ever invoked; the
//! Abort policy gate guarantees the run fails if one is.

use layerpack_core::{
    clean, BuildTarget, CommandRunner, LayerBuildPipeline, PluginConfig, PolicyGate, Resolution,
};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tempfile::tempdir;

fn config_for(root: &Path) -> PluginConfig {
    PluginConfig {
        build_dir: root.join("build").display().to_string(),
        global_includes: vec![root.join("shared")],
        global_requirements: vec![root.join("requirements.txt")],
        ..PluginConfig::default()
    }
}

fn archive_names(path: &Path) -> BTreeSet<String> {
    let file = File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Test: full build of one target with declared and global includes
#[test]
fn test_build_copies_includes_and_produces_artifact() {
    let root = tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("common")).unwrap();
    std::fs::write(root.path().join("common").join("util.py"), "x = 1").unwrap();
    std::fs::create_dir_all(root.path().join("shared")).unwrap();
    std::fs::write(root.path().join("shared").join("base.py"), "y = 2").unwrap();

    let config = config_for(root.path());
    let target = BuildTarget {
        includes: vec![root.path().join("common")],
        ..BuildTarget::named("api")
    };

    let mut gate = PolicyGate(Resolution::Abort);
    let mut runner = CommandRunner::new(&mut gate);
    let pipeline = LayerBuildPipeline::new(&config);
    let artifact = pipeline.build(&mut runner, &target).expect("build failed");

    let build_dir = Path::new(&config.build_dir).join("api");
    assert!(build_dir.join("common").join("util.py").exists());
    assert!(build_dir.join("shared").join("base.py").exists());

    assert_eq!(artifact, Path::new(&config.build_dir).join("api.zip"));
    let names = archive_names(&artifact);
    assert!(names.contains("common/util.py"));
    assert!(names.contains("shared/base.py"));
}

/// Test: building the same unchanged target twice produces the same
/// file set (directory creation and copying are idempotent)
#[test]
fn test_build_twice_is_idempotent() {
    let root = tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("shared")).unwrap();
    std::fs::write(root.path().join("shared").join("base.py"), "y = 2").unwrap();

    let config = config_for(root.path());
    let target = BuildTarget::named("api");

    let mut gate = PolicyGate(Resolution::Abort);
    let mut runner = CommandRunner::new(&mut gate);
    let pipeline = LayerBuildPipeline::new(&config);

    let first = pipeline.build(&mut runner, &target).expect("first build");
    let first_names = archive_names(&first);

    let second = pipeline.build(&mut runner, &target).expect("second build");
    let second_names = archive_names(&second);

    assert_eq!(first, second);
    assert_eq!(first_names, second_names);
}

/// Test: non-existent declared includes are silently skipped
#[test]
fn test_missing_includes_are_skipped() {
    let root = tempdir().unwrap();

    let config = config_for(root.path());
    let target = BuildTarget {
        includes: vec![root.path().join("does-not-exist")],
        ..BuildTarget::named("worker")
    };

    let mut gate = PolicyGate(Resolution::Abort);
    let mut runner = CommandRunner::new(&mut gate);
    let pipeline = LayerBuildPipeline::new(&config);
    pipeline
        .build(&mut runner, &target)
        .expect("missing includes must not fail the build");

    assert!(Path::new(&config.build_dir).join("worker.zip").exists());
}

/// Test: empty global manifest is skipped, not an error
#[test]
fn test_empty_global_manifest_is_skipped() {
    let root = tempdir().unwrap();
    std::fs::write(root.path().join("requirements.txt"), "").unwrap();

    let config = config_for(root.path());
    let target = BuildTarget::named("api");

    // Abort policy: any installer invocation fails the run, so success
    // proves the empty manifest never reached the installer.
    let mut gate = PolicyGate(Resolution::Abort);
    let mut runner = CommandRunner::new(&mut gate);
    let pipeline = LayerBuildPipeline::new(&config);
    pipeline.build(&mut runner, &target).expect("build failed");
}

/// Test: multiple targets are built in list order, each with its own
/// build directory and artifact
#[test]
fn test_run_all_builds_every_target() {
    let root = tempdir().unwrap();

    let config = config_for(root.path());
    let targets = vec![BuildTarget::named("api"), BuildTarget::named("worker")];

    let mut gate = PolicyGate(Resolution::Abort);
    let mut runner = CommandRunner::new(&mut gate);
    let pipeline = LayerBuildPipeline::new(&config);
    pipeline.run_all(&mut runner, &targets).expect("run failed");

    let build_dir = Path::new(&config.build_dir);
    assert!(build_dir.join("api").is_dir());
    assert!(build_dir.join("api.zip").exists());
    assert!(build_dir.join("worker").is_dir());
    assert!(build_dir.join("worker.zip").exists());
}

/// Test: clean() honors the cleanup flag
#[test]
fn test_clean_respects_cleanup_flag() {
    let root = tempdir().unwrap();

    let mut config = config_for(root.path());
    let target = BuildTarget::named("api");

    let mut gate = PolicyGate(Resolution::Abort);
    let mut runner = CommandRunner::new(&mut gate);
    LayerBuildPipeline::new(&config)
        .build(&mut runner, &target)
        .expect("build failed");

    config.cleanup = false;
    clean(&config);
    assert!(Path::new(&config.build_dir).exists());

    config.cleanup = true;
    clean(&config);
    assert!(!Path::new(&config.build_dir).exists());
}
