//! Compressible Euler flow around an airfoil: a finite-volume solver
//! with every required term implemented by the application.
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

    // Uniform patches sized so three refinement levels span the chord.
    let max_h = 1.1 * 120.0 / f64::powi(3.0, 5);
    let min_h = max_h;

    let mut solver = SolverDescriptor::new(
        "euler_airfoil",
        SchemeKind::FiniteVolume { patch_size: 22 },
        ResolutionBounds::new(min_h, max_h),
        0.1,
        Unknowns::block(4),
    )
    .unwrap_or_else(|errors| {
        eprint!("{}", format_all(&errors));
        std::process::exit(1);
    });
    for term in [
        PdeTerm::InitialConditions,
        PdeTerm::BoundaryConditions,
        PdeTerm::Eigenvalues,
        PdeTerm::Flux,
    ] {
        solver
            .set_implementation(term, TermBinding::UserSupplied)
            .unwrap();
    }

    let mut project = Project::new(
        Namespace::new(["exawave", "fv", "euler"]),
        "solutions",
        "AIRFOIL",
    )
    .unwrap();
    project.add_solver(solver).unwrap();

    project
        .set_global_simulation_parameters(SimulationParameters {
            dimensions: 2,
            offset: vec![-10.0, -60.0],
            size: vec![120.0, 120.0],
            min_end_time: 10.0,
            max_end_time: 10.0,
            first_plot_time_stamp: 0.0,
            time_in_between_plots: 0.5,
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
