//! Shallow-water dam break: an adaptive ADER-DG solver with a
//! user-supplied non-conservative product and refinement criterion.
//!
//! Set SPACETREE_ROOT to point at an engine installation before running.

use std::num::NonZeroUsize;

use exawave_core::{format_all, BuildMode, Namespace};
use exawave_forge::{build, generate, BuildOptions, MakeEngine};
use exawave_project::{Project, SimulationParameters};
use exawave_solver::{
    PdeTerm, ResolutionBounds, SchemeKind, SolverDescriptor, TermBinding, Unknowns,
};

fn main() {
    exawave_run::init_logging();

    // Water height, momentum, and bathymetry. The mesh may refine from
    // h = 0.1 down to 0.008 around the breaking front.
    let mut solver = SolverDescriptor::new(
        "damBreak",
        SchemeKind::AderDg { order: 5 },
        ResolutionBounds::new(0.008, 0.1),
        0.9,
        Unknowns::new().with("h", 1).with("hu", 2).with("b", 1),
    )
    .unwrap_or_else(|errors| {
        eprint!("{}", format_all(&errors));
        std::process::exit(1);
    });
    for term in [
        PdeTerm::Flux,
        PdeTerm::NonconservativeProduct,
        PdeTerm::RefinementCriterion,
    ] {
        solver
            .set_implementation(term, TermBinding::UserSupplied)
            .unwrap();
    }

    let mut project = Project::new(
        Namespace::new(["exawave", "aderdg", "swe"]),
        "solutions",
        "DAM_BREAK",
    )
    .unwrap();
    project.add_solver(solver).unwrap();

    project
        .set_global_simulation_parameters(SimulationParameters {
            dimensions: 2,
            offset: vec![-1.0, -1.0],
            size: vec![2.0, 2.0],
            min_end_time: 0.5,
            max_end_time: 0.5,
            first_plot_time_stamp: 0.0,
            time_in_between_plots: 0.1,
            periodic_boundaries: vec![false, false],
        })
        .unwrap();

    project
        .set_load_balancing("recursive-bipartition", "")
        .unwrap();
    let root = std::env::var("SPACETREE_ROOT").unwrap_or_else(|_| "../../".to_string());
    project.set_backend_installation(root, BuildMode::Release);

    let descriptor = match project.assemble() {
        Ok(descriptor) => descriptor,
        Err(errors) => {
            eprint!("{}", format_all(&errors));
            std::process::exit(1);
        }
    };

    let unit = generate(&descriptor).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    let options = BuildOptions {
        clean_first: true,
        parallelism: NonZeroUsize::new(16).unwrap(),
    };
    if let Err(err) = build(&unit, std::path::Path::new("."), &options, &MakeEngine) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
