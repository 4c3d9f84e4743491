//! Configuration diagnostics.
//!
//! This module provides the structured error type every configuration and
//! validation layer reports through. Diagnostics carry a kind, a message,
//! the solver they concern (when one is identifiable), and optional notes.
//!
//! # Design
//!
//! - `ConfigError`: single diagnostic with subject and notes
//! - `ConfigErrorKind`: categorizes errors by the contract they violate
//! - `format_all`: renders a batch of diagnostics for the error stream
//!
//! Validation across the workspace is exhaustive: callers accumulate
//! diagnostics into a `Vec<ConfigError>` and report them together, so a
//! single correction cycle can fix every defect at once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of configuration error.
///
/// # Invariant
///
/// The discriminant values must match the ERROR_KIND_NAMES array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ConfigErrorKind {
    /// Malformed scalar or value (empty name, zero order, bad relaxation).
    InvalidParameter = 0,
    /// A range whose endpoints are inverted or out of the legal interval.
    InvalidRange = 1,
    /// A sequence whose length disagrees with the declared dimensionality.
    DimensionMismatch = 2,
    /// Solver name collision within a project.
    DuplicateName = 3,
    /// A PDE term that the chosen scheme does not recognize.
    UnknownTerm = 4,
    /// A kernel optimization flag the scheme (or term set) cannot accept.
    IncompatibleOptimization = 5,
    /// A required PDE term left unbound at assembly time.
    MissingBinding = 6,
}

/// Human-readable names for error kinds.
///
/// Index matches ConfigErrorKind discriminant.
const ERROR_KIND_NAMES: &[&str] = &[
    "invalid parameter",         // 0: InvalidParameter
    "invalid range",             // 1: InvalidRange
    "dimension mismatch",        // 2: DimensionMismatch
    "duplicate name",            // 3: DuplicateName
    "unknown term",              // 4: UnknownTerm
    "incompatible optimization", // 5: IncompatibleOptimization
    "missing binding",           // 6: MissingBinding
];

impl ConfigErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn name(self) -> &'static str {
        ERROR_KIND_NAMES[self as usize]
    }
}

/// Configuration diagnostic.
///
/// Each diagnostic has:
/// - Error kind (categorizes the violated contract)
/// - Message (human-readable explanation)
/// - Optional subject (the solver the error concerns)
/// - Optional notes (additional context or suggestions)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigError {
    /// Category of this error
    pub kind: ConfigErrorKind,
    /// Primary error message
    pub message: String,
    /// Solver the error concerns, if one is identifiable
    pub solver: Option<String>,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

impl ConfigError {
    /// Creates a new diagnostic with no subject.
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            solver: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new diagnostic attributed to a solver.
    pub fn for_solver(
        kind: ConfigErrorKind,
        solver: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            solver: Some(solver.into()),
            notes: Vec::new(),
        }
    }

    /// Adds a note or hint. Returns self for chaining.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.solver {
            Some(solver) => write!(
                f,
                "error: {}: {} (solver '{}')",
                self.kind.name(),
                self.message,
                solver
            ),
            None => write!(f, "error: {}: {}", self.kind.name(), self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Formats a batch of diagnostics for the error stream.
///
/// One diagnostic per line, notes indented beneath their diagnostic.
pub fn format_all(errors: &[ConfigError]) -> String {
    let mut output = String::new();
    for error in errors {
        output.push_str(&error.to_string());
        output.push('\n');
        for note in &error.notes {
            output.push_str(&format!("   = note: {note}\n"));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ConfigError::new(ConfigErrorKind::InvalidParameter, "name must not be empty");

        assert_eq!(err.kind, ConfigErrorKind::InvalidParameter);
        assert_eq!(err.message, "name must not be empty");
        assert!(err.solver.is_none());
        assert!(err.notes.is_empty());
    }

    #[test]
    fn test_error_for_solver() {
        let err = ConfigError::for_solver(
            ConfigErrorKind::MissingBinding,
            "damBreak",
            "required term 'flux' is not bound",
        );

        assert_eq!(err.solver.as_deref(), Some("damBreak"));
    }

    #[test]
    fn test_error_with_note() {
        let err = ConfigError::new(ConfigErrorKind::InvalidRange, "min_h exceeds max_h")
            .with_note("equal bounds select uniform resolution");

        assert_eq!(err.notes.len(), 1);
    }

    #[test]
    fn test_all_error_kinds_have_names() {
        let kinds = [
            ConfigErrorKind::InvalidParameter,
            ConfigErrorKind::InvalidRange,
            ConfigErrorKind::DimensionMismatch,
            ConfigErrorKind::DuplicateName,
            ConfigErrorKind::UnknownTerm,
            ConfigErrorKind::IncompatibleOptimization,
            ConfigErrorKind::MissingBinding,
        ];

        for kind in kinds {
            assert!(!kind.name().is_empty());
        }
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::new(ConfigErrorKind::DimensionMismatch, "offset has 1 component");
        let display = err.to_string();
        assert!(display.contains("error"));
        assert!(display.contains("dimension mismatch"));
        assert!(display.contains("offset has 1 component"));
    }

    #[test]
    fn test_solver_shown_in_display() {
        let err = ConfigError::for_solver(
            ConfigErrorKind::MissingBinding,
            "euler_airfoil",
            "required term 'flux' is not bound",
        );
        assert!(err.to_string().contains("euler_airfoil"));
    }

    #[test]
    fn test_format_all_renders_every_error() {
        let errors = vec![
            ConfigError::new(ConfigErrorKind::InvalidParameter, "first defect"),
            ConfigError::new(ConfigErrorKind::InvalidRange, "second defect")
                .with_note("fix both at once"),
        ];

        let formatted = format_all(&errors);
        assert!(formatted.contains("first defect"));
        assert!(formatted.contains("second defect"));
        assert!(formatted.contains("note: fix both at once"));
    }
}
