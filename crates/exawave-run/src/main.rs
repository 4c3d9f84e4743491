//! Exawave Run - drives a project description through generation and build
//!
//! Loads a JSON project description, assembles and validates it, lowers
//! it to a generated unit, and invokes the external build system. Exits
//! zero on success; non-zero on any validation or build failure, with
//! accumulated diagnostics on the standard error stream.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use exawave_core::format_all;
use exawave_forge::{build, generate, BuildOptions, MakeEngine};
use exawave_run::{init_logging, ProjectFile};

#[derive(Parser, Debug)]
#[command(name = "exawave-run")]
#[command(about = "Generate and build a solver executable from a project description")]
struct Cli {
    /// Path to a JSON project description
    project: PathBuf,

    /// Stop after generation, do not invoke the build
    #[arg(long)]
    skip_build: bool,

    /// Clean stale artifacts of a previous build first
    #[arg(long)]
    clean: bool,

    /// Number of parallel build jobs
    #[arg(long, default_value = "1")]
    jobs: NonZeroUsize,

    /// Root directory the generated unit is installed under
    #[arg(long, default_value = ".")]
    install_root: PathBuf,
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    info!("loading project from: {}", cli.project.display());
    let contents = match std::fs::read_to_string(&cli.project) {
        Ok(contents) => contents,
        Err(err) => {
            error!("cannot read '{}': {}", cli.project.display(), err);
            std::process::exit(1);
        }
    };

    let file = match ProjectFile::from_json(&contents) {
        Ok(file) => file,
        Err(err) => {
            error!("cannot parse '{}': {}", cli.project.display(), err);
            std::process::exit(1);
        }
    };

    let project = match file.into_project() {
        Ok(project) => project,
        Err(errors) => {
            eprint!("{}", format_all(&errors));
            std::process::exit(1);
        }
    };

    let descriptor = match project.assemble() {
        Ok(descriptor) => descriptor,
        Err(errors) => {
            eprint!("{}", format_all(&errors));
            std::process::exit(1);
        }
    };

    let unit = match generate(&descriptor) {
        Ok(unit) => unit,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };
    info!(
        "generated {} files under {}",
        unit.files.len(),
        unit.install_dir.display()
    );

    if cli.skip_build {
        return;
    }

    let options = BuildOptions {
        clean_first: cli.clean,
        parallelism: cli.jobs,
    };
    match build(&unit, &cli.install_root, &options, &MakeEngine) {
        Ok(report) => info!("built {}", report.executable.display()),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}
