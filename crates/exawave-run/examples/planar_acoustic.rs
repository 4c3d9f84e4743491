//! Planar acoustic waves: a linear ADER-DG solver on a fully periodic
//! square, uniform resolution.
//!
//! Set SPACETREE_ROOT to point at an engine installation before running.

use std::num::NonZeroUsize;

use exawave_core::{format_all, BuildMode, Namespace};
use exawave_forge::{build, generate, BuildOptions, MakeEngine};
use exawave_project::{Project, SimulationParameters};
use exawave_solver::{
    KernelOptimization, PdeTerm, ResolutionBounds, SchemeKind, SolverDescriptor, TermBinding,
    Unknowns,
};

fn main() {
    exawave_run::init_logging();

    // The acoustic system: pressure plus a two-component velocity. Only
    // the flux needs an application-side implementation; the equations
    // are linear, so the specialized ADER-DG kernels apply.
    let mut solver = SolverDescriptor::new(
        "planarAcoustic",
        SchemeKind::AderDg { order: 5 },
        ResolutionBounds::uniform(0.1),
        0.9,
        Unknowns::new().with("p", 1).with("v", 2),
    )
    .unwrap_or_else(|errors| {
        eprint!("{}", format_all(&errors));
        std::process::exit(1);
    });
    solver
        .set_implementation(PdeTerm::Flux, TermBinding::UserSupplied)
        .unwrap();
    solver
        .add_kernel_optimizations([KernelOptimization::LinearEquation])
        .unwrap();

    let mut project = Project::new(
        Namespace::new(["exawave", "aderdg", "acoustic"]),
        "solutions",
        "PLANAR_WAVES",
    )
    .unwrap();
    project.add_solver(solver).unwrap();

    // Unit square around the origin, run for one diagonal crossing
    // (sqrt 2), plot every tenth of a time unit, periodic in both axes.
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
