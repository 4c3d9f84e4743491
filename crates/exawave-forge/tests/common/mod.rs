//! Shared fixtures for the forge test suites.

use std::path::Path;

use exawave_core::{BuildMode, Namespace};
use exawave_project::{Project, ProjectDescriptor, SimulationParameters};
use exawave_solver::{
    PdeTerm, ResolutionBounds, SchemeKind, SolverDescriptor, TermBinding, Unknowns,
};

/// Lays down a minimal usable engine installation under `root`.
pub fn engine_fixture(root: &Path, supported_schemes: &str) {
    let config = root.join("config");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(
        config.join("spacetree.mk"),
        format!("CXX = mpicxx\nSUPPORTED_SCHEMES = {supported_schemes}\n"),
    )
    .unwrap();
}

/// The planar-acoustic project, assembled against the given engine root.
pub fn acoustic_descriptor(engine_root: &Path) -> ProjectDescriptor {
    let mut solver = SolverDescriptor::new(
        "planarAcoustic",
        SchemeKind::AderDg { order: 5 },
        ResolutionBounds::uniform(0.1),
        0.9,
        Unknowns::new().with("p", 1).with("v", 2),
    )
    .unwrap();
    solver
        .set_implementation(PdeTerm::Flux, TermBinding::UserSupplied)
        .unwrap();

    let mut project = Project::new(
        Namespace::new(["exawave", "aderdg", "acoustic"]),
        "solutions",
        "PLANAR_WAVES",
    )
    .unwrap();
    project.add_solver(solver).unwrap();
    project
        .set_global_simulation_parameters(SimulationParameters {
            dimensions: 2,
            offset: vec![-1.0, -1.0],
            size: vec![2.0, 2.0],
            min_end_time: 1.414,
            max_end_time: 1.414,
            first_plot_time_stamp: 0.0,
            time_in_between_plots: 0.1,
            periodic_boundaries: vec![true, true],
        })
        .unwrap();
    project
        .set_load_balancing("recursive-bipartition", "min-ranks=4")
        .unwrap();
    project.set_backend_installation(engine_root, BuildMode::Release);

    project.assemble().unwrap()
}
