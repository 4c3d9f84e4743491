//! Solver descriptors.
//!
//! A `SolverDescriptor` is the immutable-after-construction record of one
//! discretization scheme instance. Construction validates every parameter
//! and reports all violations together; the two mutators refine term
//! bindings and kernel optimizations until the descriptor is attached to a
//! project, after which it is frozen.

use serde::{Deserialize, Serialize};

use exawave_core::{ConfigError, ConfigErrorKind};

use crate::scheme::{KernelOptimization, SchemeKind};
use crate::terms::{PdeTerm, TermBinding, TermBindings};
use crate::unknowns::Unknowns;

/// Minimum and maximum permitted cell size, defining the adaptivity range.
///
/// Equal bounds select uniform (non-adaptive) resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionBounds {
    /// Smallest permitted cell size.
    pub min_h: f64,
    /// Largest permitted cell size.
    pub max_h: f64,
}

impl ResolutionBounds {
    /// Bounds from a minimum and maximum cell size.
    pub fn new(min_h: f64, max_h: f64) -> Self {
        Self { min_h, max_h }
    }

    /// Uniform resolution: the mesh never refines or coarsens.
    pub fn uniform(h: f64) -> Self {
        Self { min_h: h, max_h: h }
    }

    /// Whether the bounds select uniform resolution.
    pub fn is_uniform(&self) -> bool {
        self.min_h == self.max_h
    }

    fn validate(&self, solver: &str, errors: &mut Vec<ConfigError>) {
        if !(self.min_h.is_finite() && self.min_h > 0.0) {
            errors.push(ConfigError::for_solver(
                ConfigErrorKind::InvalidParameter,
                solver,
                format!("min_h must be a positive finite real, got {}", self.min_h),
            ));
        }
        if !(self.max_h.is_finite() && self.max_h > 0.0) {
            errors.push(ConfigError::for_solver(
                ConfigErrorKind::InvalidParameter,
                solver,
                format!("max_h must be a positive finite real, got {}", self.max_h),
            ));
        }
        if self.min_h > self.max_h {
            errors.push(
                ConfigError::for_solver(
                    ConfigErrorKind::InvalidParameter,
                    solver,
                    format!("min_h {} exceeds max_h {}", self.min_h, self.max_h),
                )
                .with_note("equal bounds select uniform resolution"),
            );
        }
    }
}

/// One discretization scheme instance: scheme kind, adaptivity range,
/// time-step safety factor, unknowns, term bindings, and kernel
/// optimizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverDescriptor {
    name: String,
    scheme: SchemeKind,
    bounds: ResolutionBounds,
    time_step_relaxation: f64,
    unknowns: Unknowns,
    terms: TermBindings,
    optimizations: Vec<KernelOptimization>,
}

impl SolverDescriptor {
    /// Creates a descriptor, validating every parameter.
    ///
    /// All violations are collected and returned together, so one
    /// correction cycle fixes them all.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for: an empty name, a zero scheme parameter
    /// (`order`, `patch_size`), non-positive or inverted resolution
    /// bounds, a time-step relaxation outside `(0, 1]`, an empty unknown
    /// set, or a zero component width.
    pub fn new(
        name: impl Into<String>,
        scheme: SchemeKind,
        bounds: ResolutionBounds,
        time_step_relaxation: f64,
        unknowns: Unknowns,
    ) -> Result<Self, Vec<ConfigError>> {
        let name = name.into();
        let mut errors = Vec::new();
        let subject = if name.is_empty() { "<unnamed>" } else { &name };

        if name.is_empty() {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidParameter,
                "solver name must not be empty",
            ));
        }

        match scheme {
            SchemeKind::AderDg { order } if order == 0 => {
                errors.push(ConfigError::for_solver(
                    ConfigErrorKind::InvalidParameter,
                    subject,
                    "polynomial order must be at least 1",
                ));
            }
            SchemeKind::FiniteVolume { patch_size } if patch_size == 0 => {
                errors.push(ConfigError::for_solver(
                    ConfigErrorKind::InvalidParameter,
                    subject,
                    "patch size must be at least 1",
                ));
            }
            _ => {}
        }

        bounds.validate(subject, &mut errors);

        if !(time_step_relaxation.is_finite()
            && time_step_relaxation > 0.0
            && time_step_relaxation <= 1.0)
        {
            errors.push(ConfigError::for_solver(
                ConfigErrorKind::InvalidParameter,
                subject,
                format!(
                    "time step relaxation must lie in (0, 1], got {time_step_relaxation}"
                ),
            ));
        }

        if unknowns.is_empty() {
            errors.push(ConfigError::for_solver(
                ConfigErrorKind::InvalidParameter,
                subject,
                "a solver needs at least one unknown component",
            ));
        }
        for (component, &width) in unknowns.components() {
            if width == 0 {
                errors.push(ConfigError::for_solver(
                    ConfigErrorKind::InvalidParameter,
                    subject,
                    format!("unknown component '{component}' must have width >= 1"),
                ));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            terms: TermBindings::for_scheme(scheme),
            name,
            scheme,
            bounds,
            time_step_relaxation,
            unknowns,
            optimizations: Vec::new(),
        })
    }

    /// Binds one PDE term. Rebinding overwrites; the operation is
    /// idempotent.
    ///
    /// # Errors
    ///
    /// `UnknownTerm` if the scheme does not recognize the term.
    pub fn set_implementation(
        &mut self,
        term: PdeTerm,
        binding: TermBinding,
    ) -> Result<(), ConfigError> {
        if !self.scheme.recognizes(term) {
            return Err(ConfigError::for_solver(
                ConfigErrorKind::UnknownTerm,
                &self.name,
                format!("term '{term}' is not recognized for scheme {}", self.scheme),
            ));
        }
        self.terms.bind(term, binding);
        Ok(())
    }

    /// Adds kernel optimization flags, with set semantics.
    ///
    /// The operation is atomic: if any flag is rejected, none are applied,
    /// and every rejected flag is reported.
    ///
    /// # Errors
    ///
    /// `IncompatibleOptimization` for each flag the scheme does not
    /// support.
    pub fn add_kernel_optimizations(
        &mut self,
        flags: impl IntoIterator<Item = KernelOptimization>,
    ) -> Result<(), Vec<ConfigError>> {
        let flags: Vec<KernelOptimization> = flags.into_iter().collect();
        let errors: Vec<ConfigError> = flags
            .iter()
            .filter(|flag| !self.scheme.supports_optimization(**flag))
            .map(|flag| {
                ConfigError::for_solver(
                    ConfigErrorKind::IncompatibleOptimization,
                    &self.name,
                    format!("optimization '{flag}' is not valid for scheme {}", self.scheme),
                )
            })
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }
        for flag in flags {
            if !self.optimizations.contains(&flag) {
                self.optimizations.push(flag);
            }
        }
        Ok(())
    }

    /// Unique identifier within a project.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scheme kind with its parameters.
    pub fn scheme(&self) -> SchemeKind {
        self.scheme
    }

    /// Mesh resolution bounds.
    pub fn bounds(&self) -> ResolutionBounds {
        self.bounds
    }

    /// CFL-type safety factor in `(0, 1]`.
    pub fn time_step_relaxation(&self) -> f64 {
        self.time_step_relaxation
    }

    /// Unknowns and auxiliary variables.
    pub fn unknowns(&self) -> &Unknowns {
        &self.unknowns
    }

    /// Current term bindings.
    pub fn terms(&self) -> &TermBindings {
        &self.terms
    }

    /// Kernel optimization flags, in the order they were added.
    pub fn optimizations(&self) -> &[KernelOptimization] {
        &self.optimizations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acoustic() -> SolverDescriptor {
        SolverDescriptor::new(
            "planarAcoustic",
            SchemeKind::AderDg { order: 5 },
            ResolutionBounds::uniform(0.1),
            0.9,
            Unknowns::new().with("p", 1).with("v", 2),
        )
        .unwrap()
    }

    #[test]
    fn test_bounds_invariant_holds_after_construction() {
        let solver = acoustic();
        assert!(solver.bounds().min_h <= solver.bounds().max_h);
        assert!(solver.bounds().is_uniform());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = SolverDescriptor::new(
            "bad",
            SchemeKind::AderDg { order: 5 },
            ResolutionBounds::new(0.5, 0.1),
            0.9,
            Unknowns::block(1),
        );
        let errors = result.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::InvalidParameter
                && e.message.contains("exceeds max_h")));
    }

    #[test]
    fn test_nonpositive_bounds_rejected() {
        let result = SolverDescriptor::new(
            "bad",
            SchemeKind::AderDg { order: 5 },
            ResolutionBounds::new(0.0, 0.1),
            0.9,
            Unknowns::block(1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_construction_collects_every_violation() {
        let result = SolverDescriptor::new(
            "",
            SchemeKind::AderDg { order: 0 },
            ResolutionBounds::new(-1.0, 0.1),
            1.5,
            Unknowns::new(),
        );
        let errors = result.unwrap_err();
        // empty name, zero order, negative min_h, relaxation > 1, no unknowns
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_relaxation_of_exactly_one_is_legal() {
        let result = SolverDescriptor::new(
            "edge",
            SchemeKind::FiniteVolume { patch_size: 8 },
            ResolutionBounds::new(0.01, 0.1),
            1.0,
            Unknowns::block(4),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_width_component_rejected() {
        let result = SolverDescriptor::new(
            "bad",
            SchemeKind::AderDg { order: 3 },
            ResolutionBounds::uniform(0.1),
            0.9,
            Unknowns::new().with("p", 0),
        );
        let errors = result.unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("'p'")));
    }

    #[test]
    fn test_total_unknown_count() {
        assert_eq!(acoustic().unknowns().total(), 3);
    }

    #[test]
    fn test_set_implementation_rejects_unknown_term() {
        let mut solver = SolverDescriptor::new(
            "euler_airfoil",
            SchemeKind::FiniteVolume { patch_size: 22 },
            ResolutionBounds::new(0.4, 0.5),
            0.1,
            Unknowns::block(4),
        )
        .unwrap();

        let err = solver
            .set_implementation(PdeTerm::PointSources, TermBinding::UserSupplied)
            .unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::UnknownTerm);
        assert_eq!(err.solver.as_deref(), Some("euler_airfoil"));
    }

    #[test]
    fn test_set_implementation_is_idempotent() {
        let mut solver = acoustic();
        solver
            .set_implementation(PdeTerm::Flux, TermBinding::UserSupplied)
            .unwrap();
        solver
            .set_implementation(PdeTerm::Flux, TermBinding::UserSupplied)
            .unwrap();
        assert_eq!(solver.terms().get(PdeTerm::Flux), TermBinding::UserSupplied);
    }

    #[test]
    fn test_incompatible_optimization_rejected_atomically() {
        let mut solver = SolverDescriptor::new(
            "fv",
            SchemeKind::FiniteVolume { patch_size: 16 },
            ResolutionBounds::new(0.01, 0.1),
            0.5,
            Unknowns::block(4),
        )
        .unwrap();

        let errors = solver
            .add_kernel_optimizations([
                KernelOptimization::SinglePrecisionStorage,
                KernelOptimization::LinearEquation,
            ])
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ConfigErrorKind::IncompatibleOptimization);
        // atomic: the compatible flag was not applied either
        assert!(solver.optimizations().is_empty());
    }

    #[test]
    fn test_optimizations_have_set_semantics() {
        let mut solver = acoustic();
        solver
            .add_kernel_optimizations([KernelOptimization::LinearEquation])
            .unwrap();
        solver
            .add_kernel_optimizations([KernelOptimization::LinearEquation])
            .unwrap();
        assert_eq!(solver.optimizations().len(), 1);
    }
}
