//! PDE terms and their bindings.
//!
//! A PDE term is a named mathematical operator the numerical scheme needs
//! (flux, eigenvalues, boundary conditions, ...) whose concrete formula is
//! domain-specific and supplied externally. Each term is bound to one of
//! three states: not supplied, user-supplied (a hook is emitted, the body
//! lives in the application's implementation file), or a built-in default.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::scheme::SchemeKind;

/// Named mathematical operator required or accepted by a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdeTerm {
    Flux,
    Eigenvalues,
    InitialConditions,
    BoundaryConditions,
    NonconservativeProduct,
    RefinementCriterion,
    SourceTerm,
    PointSources,
}

impl PdeTerm {
    /// Canonical term name, as used in diagnostics and generated hooks.
    pub fn name(self) -> &'static str {
        match self {
            PdeTerm::Flux => "flux",
            PdeTerm::Eigenvalues => "eigenvalues",
            PdeTerm::InitialConditions => "initial_conditions",
            PdeTerm::BoundaryConditions => "boundary_conditions",
            PdeTerm::NonconservativeProduct => "nonconservative_product",
            PdeTerm::RefinementCriterion => "refinement_criterion",
            PdeTerm::SourceTerm => "source_term",
            PdeTerm::PointSources => "point_sources",
        }
    }

    /// Parses a term name. Accepts the canonical names plus the short
    /// form `ncp` for the non-conservative product.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "flux" => Some(PdeTerm::Flux),
            "eigenvalues" => Some(PdeTerm::Eigenvalues),
            "initial_conditions" => Some(PdeTerm::InitialConditions),
            "boundary_conditions" => Some(PdeTerm::BoundaryConditions),
            "nonconservative_product" | "ncp" => Some(PdeTerm::NonconservativeProduct),
            "refinement_criterion" => Some(PdeTerm::RefinementCriterion),
            "source_term" => Some(PdeTerm::SourceTerm),
            "point_sources" => Some(PdeTerm::PointSources),
            _ => None,
        }
    }
}

impl fmt::Display for PdeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How one PDE term is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermBinding {
    /// No implementation chosen. Illegal for required terms at assembly.
    #[default]
    NotSupplied,
    /// A hook is emitted; the body lives in the application's
    /// implementation file and is never inspected here.
    UserSupplied,
    /// The engine's built-in default implementation.
    BuiltinDefault,
}

impl TermBinding {
    /// Human-readable binding name.
    pub fn name(self) -> &'static str {
        match self {
            TermBinding::NotSupplied => "not-supplied",
            TermBinding::UserSupplied => "user-supplied",
            TermBinding::BuiltinDefault => "builtin-default",
        }
    }
}

impl fmt::Display for TermBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Binding state for every term a scheme recognizes.
///
/// Rebinding a term overwrites the previous binding; binding is
/// idempotent. Iteration order is the scheme's recognized-term order, so
/// everything downstream of the bindings is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermBindings {
    bindings: IndexMap<PdeTerm, TermBinding>,
}

impl TermBindings {
    /// Initial bindings for a scheme.
    ///
    /// Eigenvalues, initial conditions, and boundary conditions always get
    /// an emitted hook; the flux must be chosen explicitly; optional terms
    /// start unbound.
    pub fn for_scheme(scheme: SchemeKind) -> Self {
        let bindings = scheme
            .recognized_terms()
            .iter()
            .map(|&term| {
                let binding = match term {
                    PdeTerm::Eigenvalues
                    | PdeTerm::InitialConditions
                    | PdeTerm::BoundaryConditions => TermBinding::UserSupplied,
                    _ => TermBinding::NotSupplied,
                };
                (term, binding)
            })
            .collect();
        Self { bindings }
    }

    /// The binding for a term. Terms outside the scheme's recognized set
    /// read as not supplied.
    pub fn get(&self, term: PdeTerm) -> TermBinding {
        self.bindings.get(&term).copied().unwrap_or_default()
    }

    /// Overwrites the binding for a term.
    pub fn bind(&mut self, term: PdeTerm, binding: TermBinding) {
        self.bindings.insert(term, binding);
    }

    /// Iterates bindings in recognized-term order.
    pub fn iter(&self) -> impl Iterator<Item = (PdeTerm, TermBinding)> + '_ {
        self.bindings.iter().map(|(&term, &binding)| (term, binding))
    }

    /// Terms currently bound as user-supplied hooks.
    pub fn user_supplied(&self) -> impl Iterator<Item = PdeTerm> + '_ {
        self.iter()
            .filter(|&(_, binding)| binding == TermBinding::UserSupplied)
            .map(|(term, _)| term)
    }
}
