//! Generation and build orchestration for exawave
//!
//! The forge turns a validated [`ProjectDescriptor`] into a generated
//! unit (the in-memory source tree the external spacetree engine
//! consumes) and drives the engine's build system over it.
//!
//! Lowering is deterministic: the same descriptor always yields a
//! byte-identical unit. The build is the only concurrent operation in the
//! pipeline, and even there the parallelism bound is merely passed
//! through to the external build system.
//!
//! [`ProjectDescriptor`]: exawave_project::ProjectDescriptor

pub mod backend;
pub mod build;
pub mod error;
pub mod generate;

pub use backend::{probe, ResolvedBackend};
pub use build::{build, BuildEngine, BuildOptions, BuildReport, BuildTarget, EngineReport, MakeEngine};
pub use error::{ForgeError, Result};
pub use generate::{generate, GeneratedUnit};
