//! The project assembler and the frozen project descriptor.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use exawave_core::{BackendInstallation, BuildMode, ConfigError, ConfigErrorKind, Namespace};
use exawave_solver::{KernelOptimization, PdeTerm, SolverDescriptor, TermBinding};

use crate::parameters::{LoadBalancing, SimulationParameters};

/// Aggregates solver descriptors, simulation parameters, and the
/// load-balancing policy into one project description.
///
/// The assembler owns everything it is given; nothing is shared across
/// projects. It is mutable up to [`Project::assemble`], which runs the
/// exhaustive validation and freezes the result.
#[derive(Debug, Clone)]
pub struct Project {
    namespace: Namespace,
    output_path: PathBuf,
    executable_name: String,
    solvers: IndexMap<String, SolverDescriptor>,
    simulation: Option<SimulationParameters>,
    load_balancing: LoadBalancing,
    backend: Option<BackendInstallation>,
}

impl Project {
    /// Creates an assembler.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an empty namespace, an empty namespace
    /// segment, or an empty executable name; all violations are reported
    /// together.
    pub fn new(
        namespace: Namespace,
        output_path: impl Into<PathBuf>,
        executable_name: impl Into<String>,
    ) -> Result<Self, Vec<ConfigError>> {
        let executable_name = executable_name.into();
        let mut errors = Vec::new();

        if namespace.is_empty() {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidParameter,
                "project namespace must not be empty",
            ));
        }
        for segment in namespace.segments() {
            if segment.is_empty() {
                errors.push(ConfigError::new(
                    ConfigErrorKind::InvalidParameter,
                    "namespace segments must not be empty",
                ));
            }
        }
        if executable_name.is_empty() {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidParameter,
                "executable name must not be empty",
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            namespace,
            output_path: output_path.into(),
            executable_name,
            solvers: IndexMap::new(),
            simulation: None,
            load_balancing: LoadBalancing::default(),
            backend: None,
        })
    }

    /// Adds a solver. The project takes ownership; the descriptor is
    /// frozen from here on.
    ///
    /// # Errors
    ///
    /// `DuplicateName` if a solver with the same name is already present.
    /// The solver set is left unchanged in that case.
    pub fn add_solver(&mut self, solver: SolverDescriptor) -> Result<(), ConfigError> {
        if self.solvers.contains_key(solver.name()) {
            return Err(ConfigError::for_solver(
                ConfigErrorKind::DuplicateName,
                solver.name(),
                format!("a solver named '{}' is already registered", solver.name()),
            ));
        }
        self.solvers.insert(solver.name().to_string(), solver);
        Ok(())
    }

    /// Re-points the run-time results directory.
    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output_path = path.into();
    }

    /// Sets the global simulation parameters, rejecting inconsistent ones
    /// immediately.
    ///
    /// # Errors
    ///
    /// Everything [`SimulationParameters::validate`] reports:
    /// `DimensionMismatch`, `InvalidRange`, `InvalidParameter`.
    pub fn set_global_simulation_parameters(
        &mut self,
        params: SimulationParameters,
    ) -> Result<(), Vec<ConfigError>> {
        let errors = params.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        self.simulation = Some(params);
        Ok(())
    }

    /// Chooses the load-balancing strategy.
    ///
    /// Unknown strategies are deferred to the external runtime; only an
    /// empty strategy name is rejected here.
    pub fn set_load_balancing(
        &mut self,
        strategy: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let strategy = strategy.into();
        if strategy.is_empty() {
            return Err(ConfigError::new(
                ConfigErrorKind::InvalidParameter,
                "load-balancing strategy name must not be empty",
            ));
        }
        self.load_balancing = LoadBalancing {
            strategy,
            payload: payload.into(),
        };
        Ok(())
    }

    /// Records where the spacetree engine installation lives.
    ///
    /// Whether the path resolves to a usable installation is checked
    /// lazily at generation time, not here.
    pub fn set_backend_installation(&mut self, root: impl Into<PathBuf>, mode: BuildMode) {
        self.backend = Some(BackendInstallation::new(root, mode));
    }

    /// Runs the full validation and freezes the project.
    ///
    /// Validation is exhaustive, never short-circuiting: every violation
    /// across every solver is collected and returned together.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if no solver is registered or no simulation
    ///   parameters were set
    /// - everything the parameters re-check reports
    /// - `MissingBinding` for each required term left unbound, naming the
    ///   term and the solver
    /// - `IncompatibleOptimization` where a flag conflicts with the bound
    ///   terms
    pub fn assemble(self) -> Result<ProjectDescriptor, Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.solvers.is_empty() {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidParameter,
                "a project needs at least one solver",
            ));
        }

        match &self.simulation {
            Some(params) => errors.extend(params.validate()),
            None => errors.push(ConfigError::new(
                ConfigErrorKind::InvalidParameter,
                "no global simulation parameters were set",
            )),
        }

        for solver in self.solvers.values() {
            for &term in solver.scheme().required_terms() {
                if solver.terms().get(term) == TermBinding::NotSupplied {
                    errors.push(ConfigError::for_solver(
                        ConfigErrorKind::MissingBinding,
                        solver.name(),
                        format!("required term '{term}' is not bound"),
                    ));
                }
            }

            // The linear kernels drop the space-time predictor terms the
            // non-conservative product needs a hook into.
            if solver
                .optimizations()
                .contains(&KernelOptimization::LinearEquation)
                && solver.terms().get(PdeTerm::NonconservativeProduct)
                    == TermBinding::UserSupplied
            {
                errors.push(ConfigError::for_solver(
                    ConfigErrorKind::IncompatibleOptimization,
                    solver.name(),
                    "optimization 'linear-equation' cannot be combined with a \
                     user-supplied non-conservative product",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let simulation = self
            .simulation
            .expect("validated above: simulation parameters are present");

        Ok(ProjectDescriptor {
            namespace: self.namespace,
            output_path: self.output_path,
            executable_name: self.executable_name,
            solvers: self.solvers,
            simulation,
            load_balancing: self.load_balancing,
            backend: self.backend,
        })
    }

    /// Solvers registered so far, in registration order.
    pub fn solver_names(&self) -> impl Iterator<Item = &str> {
        self.solvers.keys().map(String::as_str)
    }
}

/// A validated, frozen project description.
///
/// Exclusively owns its solvers, parameters, and load-balancing
/// configuration; treated as read-only input by the forge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Namespace grouping the generated artifacts.
    pub namespace: Namespace,
    /// Directory for run-time results. Recorded, never touched.
    pub output_path: PathBuf,
    /// Name of the final build artifact.
    pub executable_name: String,
    /// Solver descriptors, in registration order.
    pub solvers: IndexMap<String, SolverDescriptor>,
    /// Global simulation parameters.
    pub simulation: SimulationParameters,
    /// Partitioning policy for the parallel runtime.
    pub load_balancing: LoadBalancing,
    /// Engine installation, if one was recorded.
    pub backend: Option<BackendInstallation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use exawave_solver::{ResolutionBounds, SchemeKind, Unknowns};

    fn acoustic_solver() -> SolverDescriptor {
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
        solver
    }

    fn square_parameters() -> SimulationParameters {
        SimulationParameters {
            dimensions: 2,
            offset: vec![-1.0, -1.0],
            size: vec![2.0, 2.0],
            min_end_time: 1.414,
            max_end_time: 1.414,
            first_plot_time_stamp: 0.0,
            time_in_between_plots: 0.1,
            periodic_boundaries: vec![true, true],
        }
    }

    fn acoustic_project() -> Project {
        let mut project = Project::new(
            Namespace::new(["exawave", "aderdg", "acoustic"]),
            ".",
            "PLANAR_WAVES",
        )
        .unwrap();
        project.add_solver(acoustic_solver()).unwrap();
        project
            .set_global_simulation_parameters(square_parameters())
            .unwrap();
        project
    }

    #[test]
    fn test_empty_namespace_and_executable_both_reported() {
        let result = Project::new(Namespace::new(Vec::<String>::new()), ".", "");
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ConfigErrorKind::InvalidParameter));
    }

    #[test]
    fn test_duplicate_solver_leaves_set_unchanged() {
        let mut project = acoustic_project();
        let err = project.add_solver(acoustic_solver()).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::DuplicateName);
        assert_eq!(project.solver_names().count(), 1);
    }

    #[test]
    fn test_assemble_succeeds_for_complete_project() {
        let descriptor = acoustic_project().assemble().unwrap();
        assert_eq!(descriptor.executable_name, "PLANAR_WAVES");
        assert_eq!(descriptor.solvers.len(), 1);
        assert_eq!(descriptor.namespace.to_string(), "exawave::aderdg::acoustic");
    }

    #[test]
    fn test_missing_flux_names_term_and_solver() {
        let mut project = Project::new(
            Namespace::new(["exawave", "fv", "euler"]),
            ".",
            "AIRFOIL",
        )
        .unwrap();
        let solver = SolverDescriptor::new(
            "euler_airfoil",
            SchemeKind::FiniteVolume { patch_size: 22 },
            ResolutionBounds::new(0.4, 0.5),
            0.1,
            Unknowns::block(4),
        )
        .unwrap();
        project.add_solver(solver).unwrap();
        project
            .set_global_simulation_parameters(square_parameters())
            .unwrap();

        let errors = project.assemble().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ConfigErrorKind::MissingBinding);
        assert!(errors[0].message.contains("'flux'"));
        assert_eq!(errors[0].solver.as_deref(), Some("euler_airfoil"));
    }

    #[test]
    fn test_validation_collects_independent_defects() {
        // An unbound flux and a negative domain extent must be reported
        // together, not one at a time.
        let mut project = Project::new(
            Namespace::new(["exawave", "fv", "euler"]),
            ".",
            "AIRFOIL",
        )
        .unwrap();
        let solver = SolverDescriptor::new(
            "euler_airfoil",
            SchemeKind::FiniteVolume { patch_size: 22 },
            ResolutionBounds::new(0.4, 0.5),
            0.1,
            Unknowns::block(4),
        )
        .unwrap();
        project.add_solver(solver).unwrap();

        let mut params = square_parameters();
        params.size[0] = -2.0;
        // The setter rejects these immediately; bypass it so assembly
        // sees a project carrying both defects.
        project.simulation = Some(params);

        let errors = project.assemble().unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::MissingBinding));
        assert!(errors.iter().any(|e| e.kind == ConfigErrorKind::InvalidRange));
    }

    #[test]
    fn test_assemble_rejects_empty_project() {
        let project = Project::new(Namespace::new(["ns"]), ".", "EXE").unwrap();
        let errors = project.assemble().unwrap_err();
        // no solver and no parameters
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_linear_optimization_conflicts_with_user_ncp() {
        let mut solver = acoustic_solver();
        solver
            .set_implementation(PdeTerm::NonconservativeProduct, TermBinding::UserSupplied)
            .unwrap();
        solver
            .add_kernel_optimizations([KernelOptimization::LinearEquation])
            .unwrap();

        let mut project = Project::new(Namespace::new(["ns"]), ".", "EXE").unwrap();
        project.add_solver(solver).unwrap();
        project
            .set_global_simulation_parameters(square_parameters())
            .unwrap();

        let errors = project.assemble().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ConfigErrorKind::IncompatibleOptimization);
    }

    #[test]
    fn test_empty_strategy_name_rejected() {
        let mut project = acoustic_project();
        let err = project.set_load_balancing("", "").unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvalidParameter);
        // the previous (default) strategy is untouched
        let descriptor = project.assemble().unwrap();
        assert_eq!(descriptor.load_balancing.strategy, "recursive-bipartition");
    }

    #[test]
    fn test_load_balancing_payload_passes_through() {
        let mut project = acoustic_project();
        project
            .set_load_balancing("recursive-bipartition", "min-ranks=4")
            .unwrap();
        let descriptor = project.assemble().unwrap();
        assert_eq!(descriptor.load_balancing.payload, "min-ranks=4");
    }
}
