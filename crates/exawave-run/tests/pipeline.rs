//! End-to-end pipeline tests: JSON description through assembly,
//! generation, and a mocked build.

use std::num::NonZeroUsize;
use std::path::Path;

use exawave_core::BuildMode;
use exawave_forge::build::mock::{MockBehavior, MockEngine};
use exawave_forge::{build, generate, BuildOptions};
use exawave_run::ProjectFile;

const PLANAR_ACOUSTIC: &str = include_str!("fixtures/planar_acoustic.json");

fn engine_fixture(root: &Path) {
    let config = root.join("config");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(
        config.join("spacetree.mk"),
        "CXX = mpicxx\nSUPPORTED_SCHEMES = ader-dg finite-volume\n",
    )
    .unwrap();
}

#[test]
fn test_fixture_runs_the_whole_pipeline() {
    let engine_dir = tempfile::tempdir().unwrap();
    engine_fixture(engine_dir.path());

    let file = ProjectFile::from_json(PLANAR_ACOUSTIC).unwrap();
    let mut project = file.into_project().unwrap();
    project.set_backend_installation(engine_dir.path(), BuildMode::Release);

    let descriptor = project.assemble().unwrap();
    let unit = generate(&descriptor).unwrap();
    assert!(unit.files.contains_key(Path::new("planarAcoustic.h")));
    assert!(unit.files.contains_key(Path::new("Makefile")));
    assert!(unit.files.contains_key(Path::new("project.manifest.json")));

    let out = tempfile::tempdir().unwrap();
    let engine = MockEngine::new(MockBehavior::Succeeds {
        output: String::new(),
    });
    let options = BuildOptions {
        clean_first: true,
        parallelism: NonZeroUsize::new(4).unwrap(),
    };

    let report = build(&unit, out.path(), &options, &engine).unwrap();
    assert!(report.executable.ends_with("PLANAR_WAVES"));
    assert_eq!(engine.invocations().len(), 2);
}

#[test]
fn test_generation_without_backend_fails() {
    let file = ProjectFile::from_json(PLANAR_ACOUSTIC).unwrap();
    let descriptor = file.into_project().unwrap().assemble().unwrap();

    assert!(generate(&descriptor).is_err());
}

#[test]
fn test_descriptor_round_trips_through_json() {
    let engine_dir = tempfile::tempdir().unwrap();
    engine_fixture(engine_dir.path());

    let file = ProjectFile::from_json(PLANAR_ACOUSTIC).unwrap();
    let mut project = file.into_project().unwrap();
    project.set_backend_installation(engine_dir.path(), BuildMode::Release);
    let descriptor = project.assemble().unwrap();

    let text = serde_json::to_string(&descriptor).unwrap();
    let back: exawave_project::ProjectDescriptor = serde_json::from_str(&text).unwrap();
    assert_eq!(descriptor, back);

    // and the frozen descriptor generates the same unit either way
    assert_eq!(generate(&descriptor).unwrap(), generate(&back).unwrap());
}
