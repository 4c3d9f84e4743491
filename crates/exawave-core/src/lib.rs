//! Exawave Core
//!
//! Foundation types shared across the exawave crates: hierarchical
//! namespaces, backend build modes, and the configuration diagnostics
//! that every validation layer reports through.

pub mod backend;
pub mod diagnostics;
pub mod namespace;

pub use backend::{BackendInstallation, BuildMode};
pub use diagnostics::{format_all, ConfigError, ConfigErrorKind};
pub use namespace::Namespace;
