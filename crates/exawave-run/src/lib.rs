//! Exawave Run
//!
//! Entry-point plumbing for driving the configuration-to-build pipeline
//! from a declarative JSON project description.

pub mod project_file;

pub use project_file::ProjectFile;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,exawave_forge=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
