//! Hierarchical namespaces for generated artifacts
//!
//! Every project owns a namespace path that groups its generated sources
//! and keeps artifacts from different projects from colliding.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Ordered sequence of identifiers naming a project's generated artifacts.
///
/// A namespace like `["exawave", "aderdg", "acoustic"]` maps both to the
/// nested namespace of the emitted sources and to the directory the
/// generated unit is installed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Ordered segments, outermost first.
    pub segments: Vec<String>,
}

impl Namespace {
    /// Creates a namespace from a list of segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the namespace has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the last segment (leaf name).
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Joins the segments into a single string using the given separator.
    pub fn join(&self, sep: &str) -> String {
        self.segments.join(sep)
    }

    /// The directory the generated unit for this namespace installs under.
    pub fn install_dir(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}
