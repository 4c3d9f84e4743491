//! Discretization scheme kinds and kernel optimization flags.
//!
//! A scheme kind carries its scheme-specific parameters as enum payload,
//! so a descriptor can never be missing a required parameter. Which PDE
//! terms a scheme recognizes and which optimization flags it accepts are
//! table-driven here; the descriptor and the project validator consult
//! these tables rather than encoding scheme knowledge themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::terms::PdeTerm;

/// The family of numerical discretization applied to the governing
/// equations, with its scheme-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SchemeKind {
    /// ADER discontinuous-Galerkin with time reconstruction.
    AderDg {
        /// Polynomial order of the spatial basis.
        order: u32,
    },
    /// Finite-volume patches.
    FiniteVolume {
        /// Cells per patch axis.
        patch_size: u32,
    },
}

/// Optional flags selecting specialized numerical kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KernelOptimization {
    /// The equation system is linear; selects the linear ADER-DG kernels.
    LinearEquation,
    /// Store the solution in single precision between time steps.
    SinglePrecisionStorage,
    /// PDE term hooks carry no solver state and may be offloaded.
    StatelessPdeTerms,
}

impl KernelOptimization {
    /// Human-readable flag name.
    pub fn name(self) -> &'static str {
        match self {
            KernelOptimization::LinearEquation => "linear-equation",
            KernelOptimization::SinglePrecisionStorage => "single-precision-storage",
            KernelOptimization::StatelessPdeTerms => "stateless-pde-terms",
        }
    }
}

impl fmt::Display for KernelOptimization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Terms every scheme recognizes.
const COMMON_TERMS: &[PdeTerm] = &[
    PdeTerm::Flux,
    PdeTerm::Eigenvalues,
    PdeTerm::InitialConditions,
    PdeTerm::BoundaryConditions,
    PdeTerm::NonconservativeProduct,
    PdeTerm::RefinementCriterion,
    PdeTerm::SourceTerm,
];

/// Terms only the ADER-DG kernels can integrate.
const ADER_DG_TERMS: &[PdeTerm] = &[
    PdeTerm::Flux,
    PdeTerm::Eigenvalues,
    PdeTerm::InitialConditions,
    PdeTerm::BoundaryConditions,
    PdeTerm::NonconservativeProduct,
    PdeTerm::RefinementCriterion,
    PdeTerm::SourceTerm,
    PdeTerm::PointSources,
];

/// Terms that must not remain unbound at assembly time, for any scheme.
const REQUIRED_TERMS: &[PdeTerm] = &[
    PdeTerm::Flux,
    PdeTerm::Eigenvalues,
    PdeTerm::InitialConditions,
    PdeTerm::BoundaryConditions,
];

impl SchemeKind {
    /// The scheme family name used in generated artifacts and the engine
    /// manifest.
    pub fn family(self) -> &'static str {
        match self {
            SchemeKind::AderDg { .. } => "ader-dg",
            SchemeKind::FiniteVolume { .. } => "finite-volume",
        }
    }

    /// The PDE terms this scheme recognizes.
    ///
    /// Point sources are integrated by the ADER-DG kernels only.
    pub fn recognized_terms(self) -> &'static [PdeTerm] {
        match self {
            SchemeKind::AderDg { .. } => ADER_DG_TERMS,
            SchemeKind::FiniteVolume { .. } => COMMON_TERMS,
        }
    }

    /// The PDE terms that must be bound before a project assembles.
    pub fn required_terms(self) -> &'static [PdeTerm] {
        REQUIRED_TERMS
    }

    /// Whether a term is recognized for this scheme.
    pub fn recognizes(self, term: PdeTerm) -> bool {
        self.recognized_terms().contains(&term)
    }

    /// Whether an optimization flag selects kernels this scheme has.
    pub fn supports_optimization(self, flag: KernelOptimization) -> bool {
        match (self, flag) {
            // Only the ADER-DG kernel set has a linear specialization.
            (SchemeKind::FiniteVolume { .. }, KernelOptimization::LinearEquation) => false,
            _ => true,
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeKind::AderDg { order } => write!(f, "ader-dg(order {order})"),
            SchemeKind::FiniteVolume { patch_size } => {
                write!(f, "finite-volume(patch {patch_size})")
            }
        }
    }
}
