//! On-disk project descriptions.
//!
//! A project file is the declarative JSON form of the pipeline's
//! configuration: solvers, domain, load balancing, and backend
//! installation in one document. Unrecognized keys are rejected at parse
//! time; everything else goes through the same validation as the
//! programmatic API, with all defects accumulated.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use exawave_core::{BuildMode, ConfigError, ConfigErrorKind, Namespace};
use exawave_project::{Project, SimulationParameters};
use exawave_solver::{
    KernelOptimization, PdeTerm, ResolutionBounds, SchemeKind, SolverDescriptor, TermBinding,
    Unknowns,
};

/// Root of a JSON project description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    /// Namespace segments for the generated artifacts.
    pub namespace: Vec<String>,
    /// Directory for run-time results.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Name of the final build artifact.
    pub executable: String,
    /// Global simulation parameters.
    pub simulation: SimulationParameters,
    /// Partitioning policy; the engine default when omitted.
    #[serde(default)]
    pub load_balancing: Option<LoadBalancingFile>,
    /// Engine installation; generation fails without one.
    #[serde(default)]
    pub backend: Option<BackendFile>,
    /// Solver descriptions.
    pub solvers: Vec<SolverFile>,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(".")
}

/// Load-balancing section of a project file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadBalancingFile {
    pub strategy: String,
    #[serde(default)]
    pub payload: String,
}

/// Backend section of a project file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendFile {
    pub root: PathBuf,
    pub mode: BuildMode,
}

/// One solver description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverFile {
    pub name: String,
    pub scheme: SchemeKind,
    pub min_h: f64,
    pub max_h: f64,
    pub time_step_relaxation: f64,
    /// Component name to vector width, in declaration order.
    pub unknowns: IndexMap<String, u32>,
    #[serde(default)]
    pub auxiliary_variables: u32,
    /// Term name to binding. Accepts the short form `ncp`.
    #[serde(default)]
    pub terms: IndexMap<String, TermBinding>,
    #[serde(default)]
    pub optimizations: Vec<KernelOptimization>,
}

impl SolverFile {
    /// Builds the descriptor, accumulating every defect.
    fn into_descriptor(self) -> Result<SolverDescriptor, Vec<ConfigError>> {
        let name = self.name.clone();
        let mut descriptor = SolverDescriptor::new(
            self.name,
            self.scheme,
            ResolutionBounds::new(self.min_h, self.max_h),
            self.time_step_relaxation,
            Unknowns::from_components(self.unknowns, self.auxiliary_variables),
        )?;

        let mut errors = Vec::new();
        for (term_name, binding) in self.terms {
            match PdeTerm::from_name(&term_name) {
                Some(term) => {
                    if let Err(err) = descriptor.set_implementation(term, binding) {
                        errors.push(err);
                    }
                }
                None => errors.push(ConfigError::for_solver(
                    ConfigErrorKind::UnknownTerm,
                    &name,
                    format!("unknown PDE term '{term_name}'"),
                )),
            }
        }
        if let Err(errs) = descriptor.add_kernel_optimizations(self.optimizations) {
            errors.extend(errs);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(descriptor)
    }
}

impl ProjectFile {
    /// Parses a project description from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Turns the file into an assembler-ready project, accumulating
    /// every configuration defect across all sections.
    pub fn into_project(self) -> Result<Project, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let mut solvers = Vec::new();
        for file in self.solvers {
            match file.into_descriptor() {
                Ok(solver) => solvers.push(solver),
                Err(errs) => errors.extend(errs),
            }
        }

        let mut project =
            match Project::new(Namespace::new(self.namespace), self.output_path, self.executable) {
                Ok(project) => project,
                Err(errs) => {
                    errors.extend(errs);
                    return Err(errors);
                }
            };

        for solver in solvers {
            if let Err(err) = project.add_solver(solver) {
                errors.push(err);
            }
        }

        if let Err(errs) = project.set_global_simulation_parameters(self.simulation) {
            errors.extend(errs);
        }

        if let Some(lb) = self.load_balancing {
            if let Err(err) = project.set_load_balancing(lb.strategy, lb.payload) {
                errors.push(err);
            }
        }

        if let Some(backend) = self.backend {
            project.set_backend_installation(backend.root, backend.mode);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(project)
    }
}
