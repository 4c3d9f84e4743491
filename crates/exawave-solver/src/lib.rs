// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Solver data model for exawave
//!
//! This crate contains the descriptor types a caller uses to describe one
//! discretization scheme instance: the scheme kind, mesh resolution
//! bounds, unknowns, PDE term bindings, and kernel optimizations.
//!
//! Descriptors are validated exhaustively at construction and refined by
//! the `set_implementation` / `add_kernel_optimizations` mutators, then
//! frozen once attached to a project.

pub mod descriptor;
pub mod scheme;
pub mod terms;
pub mod unknowns;

pub use descriptor::{ResolutionBounds, SolverDescriptor};
pub use scheme::{KernelOptimization, SchemeKind};
pub use terms::{PdeTerm, TermBinding, TermBindings};
pub use unknowns::Unknowns;
