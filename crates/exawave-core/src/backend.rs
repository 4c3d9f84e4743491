//! Backend installation record.
//!
//! The spacetree engine is an external collaborator: this crate only
//! records where an installation lives and which compile mode the
//! generated unit should request. Whether the path actually resolves to a
//! usable installation is an environment fact, checked lazily by the forge
//! at generation time.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Compile mode requested from the external engine's build harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// No optimization, full symbols.
    Debug,
    /// Optimized with assertions retained.
    Asserts,
    /// Optimized with tracing instrumentation.
    Trace,
    /// Full optimization.
    Release,
}

impl BuildMode {
    /// The mode name as the engine's makefile fragment expects it.
    pub fn name(self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Asserts => "asserts",
            BuildMode::Trace => "trace",
            BuildMode::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where the external generation/build engine lives, plus the compile mode
/// generated units should be built in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInstallation {
    /// Root directory of the engine installation.
    pub root: PathBuf,
    /// Compile mode for generated units.
    pub mode: BuildMode,
}

impl BackendInstallation {
    /// Records an installation root and compile mode.
    pub fn new(root: impl Into<PathBuf>, mode: BuildMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }
}
