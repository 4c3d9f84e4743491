//! Orchestration errors.
//!
//! Configuration defects never reach the forge: they are caught and
//! collected by the project assembler. What remains here are environment
//! and collaborator failures, which are surfaced verbatim with enough
//! context to locate the cause and are never retried.

use std::path::PathBuf;

use thiserror::Error;

/// Forge result type
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Orchestration errors
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("spacetree installation not usable: {reason}")]
    NotFound { reason: String },

    #[error("generation failed for project '{project}': {message}")]
    GenerationFailed { project: String, message: String },

    #[error("build failed for project '{project}':\n{output}")]
    BuildFailed { project: String, output: String },

    #[error("i/o failure at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
