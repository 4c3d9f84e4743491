//! Spacetree installation probing.
//!
//! A project only records where the engine is supposed to live; whether
//! that path actually resolves to a usable installation is an environment
//! fact. The probe runs at generation time, reads the engine's makefile
//! fragment, and extracts the scheme families the installed engine
//! declares support for.

use std::path::PathBuf;

use tracing::debug;

use exawave_core::{BackendInstallation, BuildMode};

use crate::error::{ForgeError, Result};

/// Relative path of the makefile fragment every usable installation
/// carries.
pub const ENGINE_FRAGMENT: &str = "config/spacetree.mk";

/// Variable in the fragment listing supported scheme families. Older
/// engines do not declare one; those are assumed to support everything.
const SUPPORTED_SCHEMES_VAR: &str = "SUPPORTED_SCHEMES";

/// A probed, usable engine installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackend {
    /// Root directory of the installation.
    pub root: PathBuf,
    /// Compile mode generated units request.
    pub mode: BuildMode,
    /// Scheme families the engine declares support for; `None` if the
    /// fragment declares nothing.
    pub supported_schemes: Option<Vec<String>>,
}

impl ResolvedBackend {
    /// Whether the engine supports a scheme family.
    pub fn supports_scheme(&self, family: &str) -> bool {
        match &self.supported_schemes {
            Some(families) => families.iter().any(|f| f == family),
            None => true,
        }
    }
}

/// Checks that an installation is usable and reads its declarations.
///
/// # Errors
///
/// `NotFound` if the root is not a directory, the makefile fragment is
/// missing, or the fragment cannot be read.
pub fn probe(install: &BackendInstallation) -> Result<ResolvedBackend> {
    if !install.root.is_dir() {
        return Err(ForgeError::NotFound {
            reason: format!("'{}' is not a directory", install.root.display()),
        });
    }

    let fragment = install.root.join(ENGINE_FRAGMENT);
    if !fragment.is_file() {
        return Err(ForgeError::NotFound {
            reason: format!(
                "'{}' has no {ENGINE_FRAGMENT}",
                install.root.display()
            ),
        });
    }

    let contents = std::fs::read_to_string(&fragment).map_err(|source| ForgeError::NotFound {
        reason: format!("cannot read '{}': {source}", fragment.display()),
    })?;

    let supported_schemes = parse_supported_schemes(&contents);
    debug!(
        root = %install.root.display(),
        schemes = ?supported_schemes,
        "probed spacetree installation"
    );

    Ok(ResolvedBackend {
        root: install.root.clone(),
        mode: install.mode,
        supported_schemes,
    })
}

/// Extracts the `SUPPORTED_SCHEMES = a b c` declaration, if present.
fn parse_supported_schemes(fragment: &str) -> Option<Vec<String>> {
    fragment.lines().find_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix(SUPPORTED_SCHEMES_VAR)?.trim_start();
        let values = rest.strip_prefix('=')?;
        Some(
            values
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>(),
        )
    })
}
