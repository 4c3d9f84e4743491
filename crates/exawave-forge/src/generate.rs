//! Lowering a project descriptor to a generated unit.
//!
//! Generation is a pure function of the descriptor: the same descriptor
//! always yields a byte-identical unit. Solver order is registration
//! order, files are kept in a sorted map, and nothing here reads clocks
//! or global state.
//!
//! The unit consists of one hook header per solver (the signatures the
//! application's implementation files must satisfy), the project
//! makefile binding the engine's fragment, and a JSON manifest the engine
//! reads the domain setup from.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use exawave_core::BuildMode;
use exawave_project::ProjectDescriptor;
use exawave_solver::{KernelOptimization, PdeTerm, SchemeKind, SolverDescriptor, TermBinding};

use crate::backend::{probe, ResolvedBackend, ENGINE_FRAGMENT};
use crate::error::{ForgeError, Result};

/// The in-memory source tree generated from one project descriptor.
///
/// File paths are relative to [`GeneratedUnit::install_dir`], which is
/// itself relative to whatever root the unit is materialized under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedUnit {
    /// Directory the unit installs under, derived from the namespace.
    pub install_dir: PathBuf,
    /// Name of the final build artifact.
    pub executable_name: String,
    /// Compile mode the build requests from the engine.
    pub build_mode: BuildMode,
    /// Relative file path to file content, sorted.
    pub files: BTreeMap<PathBuf, String>,
}

impl GeneratedUnit {
    /// Writes the unit under `root`, creating directories as needed.
    ///
    /// Returns the directory the files were written into.
    pub fn materialize(&self, root: &Path) -> Result<PathBuf> {
        let dir = root.join(&self.install_dir);
        std::fs::create_dir_all(&dir).map_err(|source| ForgeError::Io {
            path: dir.clone(),
            source,
        })?;

        for (rel_path, content) in &self.files {
            let path = dir.join(rel_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ForgeError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&path, content).map_err(|source| ForgeError::Io { path, source })?;
        }

        debug!(dir = %dir.display(), files = self.files.len(), "materialized unit");
        Ok(dir)
    }
}

/// Lowers a validated descriptor to a generated unit.
///
/// # Errors
///
/// - `NotFound` if no backend installation was recorded or the recorded
///   one does not probe as usable
/// - `GenerationFailed` if the installed engine rejects the descriptor
///   (a solver's scheme family is outside what the engine declares)
pub fn generate(descriptor: &ProjectDescriptor) -> Result<GeneratedUnit> {
    let backend = descriptor
        .backend
        .as_ref()
        .ok_or_else(|| ForgeError::NotFound {
            reason: "no backend installation recorded on the project".to_string(),
        })?;
    let resolved = probe(backend)?;

    for solver in descriptor.solvers.values() {
        let family = solver.scheme().family();
        if !resolved.supports_scheme(family) {
            return Err(ForgeError::GenerationFailed {
                project: descriptor.executable_name.clone(),
                message: format!(
                    "engine at '{}' does not support scheme family '{}' needed by solver '{}'",
                    resolved.root.display(),
                    family,
                    solver.name()
                ),
            });
        }
    }

    let mut files = BTreeMap::new();
    for solver in descriptor.solvers.values() {
        files.insert(
            PathBuf::from(format!("{}.h", solver.name())),
            solver_header(descriptor, solver),
        );
    }
    files.insert(PathBuf::from("Makefile"), makefile(descriptor, &resolved));
    files.insert(
        PathBuf::from("project.manifest.json"),
        manifest_json(descriptor)?,
    );

    info!(
        project = %descriptor.executable_name,
        solvers = descriptor.solvers.len(),
        files = files.len(),
        "generated unit"
    );

    Ok(GeneratedUnit {
        install_dir: descriptor.namespace.install_dir(),
        executable_name: descriptor.executable_name.clone(),
        build_mode: resolved.mode,
        files,
    })
}

/// One hook header per solver: the signatures the application's
/// implementation file must satisfy for every bound term.
fn solver_header(descriptor: &ProjectDescriptor, solver: &SolverDescriptor) -> String {
    let unknowns = solver.unknowns();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "// Generated by exawave for solver '{}'. Do not edit.",
        solver.name()
    );
    let _ = writeln!(out, "#pragma once");
    out.push('\n');
    let _ = writeln!(out, "// scheme: {}", solver.scheme());
    let _ = writeln!(
        out,
        "// solution vector Q carries {} unknowns plus {} auxiliary entries",
        unknowns.total(),
        unknowns.auxiliary_variables()
    );
    let _ = writeln!(
        out,
        "// resolution: min_h {}, max_h {}, time step relaxation {}",
        solver.bounds().min_h,
        solver.bounds().max_h,
        solver.time_step_relaxation()
    );
    out.push('\n');

    for segment in descriptor.namespace.segments() {
        let _ = writeln!(out, "namespace {segment} {{");
    }
    out.push('\n');

    for (term, binding) in solver.terms().iter() {
        if binding == TermBinding::NotSupplied {
            continue;
        }
        let origin = match binding {
            TermBinding::UserSupplied => "user-supplied",
            TermBinding::BuiltinDefault => "engine default",
            TermBinding::NotSupplied => unreachable!(),
        };
        let _ = writeln!(out, "// {term}: {origin}");
        let _ = writeln!(out, "{}", hook_declaration(solver.name(), term));
    }

    for segment in descriptor.namespace.segments().iter().rev() {
        let _ = writeln!(out, "}} // namespace {segment}");
    }

    out
}

/// The C signature emitted for one term's hook.
fn hook_declaration(solver: &str, term: PdeTerm) -> String {
    match term {
        PdeTerm::Flux => format!(
            "void {solver}_flux(const double* Q, const double* x, double t, int normal, double* F);"
        ),
        PdeTerm::Eigenvalues => format!(
            "void {solver}_eigenvalues(const double* Q, const double* x, double t, int normal, double* lambda);"
        ),
        PdeTerm::InitialConditions => {
            format!("void {solver}_initial_conditions(const double* x, double t, double* Q);")
        }
        PdeTerm::BoundaryConditions => format!(
            "void {solver}_boundary_conditions(const double* Q_inside, double* Q_outside, const double* x, double t, int normal);"
        ),
        PdeTerm::NonconservativeProduct => format!(
            "void {solver}_nonconservative_product(const double* Q, const double* grad_Q, const double* x, double t, int normal, double* BgradQ);"
        ),
        PdeTerm::RefinementCriterion => {
            format!("int {solver}_refinement_criterion(const double* Q, const double* x, double t);")
        }
        PdeTerm::SourceTerm => {
            format!("void {solver}_source_term(const double* Q, const double* x, double t, double* S);")
        }
        PdeTerm::PointSources => {
            format!("void {solver}_point_sources(const double* x, double t, double* S);")
        }
    }
}

/// The project makefile: binds the engine fragment, the compile mode, and
/// the load-balancing strategy string.
fn makefile(descriptor: &ProjectDescriptor, backend: &ResolvedBackend) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Generated by exawave. Do not edit.");
    let _ = writeln!(out, "SPACETREE_ROOT = {}", backend.root.display());
    let _ = writeln!(out, "BUILD_MODE = {}", backend.mode);
    let _ = writeln!(out, "EXECUTABLE = {}", descriptor.executable_name);
    let _ = writeln!(
        out,
        "PROJECT_NAMESPACE = {}",
        descriptor.namespace.join("::")
    );
    let _ = writeln!(
        out,
        "LOAD_BALANCING = {}",
        descriptor.load_balancing.strategy
    );
    let _ = writeln!(
        out,
        "LOAD_BALANCING_ARGS = {}",
        descriptor.load_balancing.payload
    );
    let headers: Vec<String> = descriptor
        .solvers
        .values()
        .map(|solver| format!("{}.h", solver.name()))
        .collect();
    let _ = writeln!(out, "SOLVER_HEADERS = {}", headers.join(" "));
    out.push('\n');
    let _ = writeln!(out, "include $(SPACETREE_ROOT)/{ENGINE_FRAGMENT}");

    out
}

/// Manifest handed to the engine: domain setup, cadences, and per-solver
/// summaries.
#[derive(Serialize)]
struct Manifest<'a> {
    namespace: String,
    executable: &'a str,
    output_path: &'a Path,
    simulation: &'a exawave_project::SimulationParameters,
    load_balancing: &'a exawave_project::LoadBalancing,
    solvers: Vec<ManifestSolver<'a>>,
}

#[derive(Serialize)]
struct ManifestSolver<'a> {
    name: &'a str,
    scheme: SchemeKind,
    min_h: f64,
    max_h: f64,
    time_step_relaxation: f64,
    unknowns: u32,
    auxiliary_variables: u32,
    user_supplied_hooks: Vec<&'static str>,
    optimizations: &'a [KernelOptimization],
}

fn manifest_json(descriptor: &ProjectDescriptor) -> Result<String> {
    let manifest = Manifest {
        namespace: descriptor.namespace.join("::"),
        executable: &descriptor.executable_name,
        output_path: &descriptor.output_path,
        simulation: &descriptor.simulation,
        load_balancing: &descriptor.load_balancing,
        solvers: descriptor
            .solvers
            .values()
            .map(|solver| ManifestSolver {
                name: solver.name(),
                scheme: solver.scheme(),
                min_h: solver.bounds().min_h,
                max_h: solver.bounds().max_h,
                time_step_relaxation: solver.time_step_relaxation(),
                unknowns: solver.unknowns().total(),
                auxiliary_variables: solver.unknowns().auxiliary_variables(),
                user_supplied_hooks: solver
                    .terms()
                    .user_supplied()
                    .map(PdeTerm::name)
                    .collect(),
                optimizations: solver.optimizations(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&manifest).map_err(|err| ForgeError::GenerationFailed {
        project: descriptor.executable_name.clone(),
        message: format!("cannot serialize project manifest: {err}"),
    })
}
