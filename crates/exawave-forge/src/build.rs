//! Build driver.
//!
//! Building delegates to the external engine's build system through the
//! [`BuildEngine`] trait, so tests can swap in a mock without spawning
//! processes. The production engine shells out to `make` and blocks until
//! the build completes or fails; there is no cancellation or timeout
//! contract, and failures are never retried.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{ForgeError, Result};
use crate::generate::GeneratedUnit;

/// What one engine invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    /// Remove every stale artifact of a previous build.
    Clean,
    /// Compile and link the executable.
    All,
}

/// Options for one build run.
///
/// `clean_first` guarantees no stale artifacts influence the result;
/// leaving it off permits incremental reuse and is only safe if the unit
/// is unchanged since the last successful build, which is the caller's
/// responsibility. `parallelism` bounds the number of concurrently
/// compiled translation units and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub clean_first: bool,
    pub parallelism: NonZeroUsize,
}

/// Raw outcome of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReport {
    /// Whether the engine exited successfully.
    pub success: bool,
    /// The engine's diagnostic output, verbatim.
    pub output: String,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Path of the compiled executable.
    pub executable: PathBuf,
    /// The engine's output from the final invocation.
    pub output: String,
}

/// The external build system, behind a seam tests can mock.
pub trait BuildEngine {
    /// Runs one build target in `dir`, blocking until completion.
    ///
    /// Returns `Err` only when the engine could not be invoked at all;
    /// an engine that ran and failed reports through
    /// [`EngineReport::success`].
    fn invoke(
        &self,
        dir: &Path,
        target: BuildTarget,
        parallelism: NonZeroUsize,
    ) -> std::io::Result<EngineReport>;
}

/// Production engine: shells out to `make`.
pub struct MakeEngine;

impl BuildEngine for MakeEngine {
    fn invoke(
        &self,
        dir: &Path,
        target: BuildTarget,
        parallelism: NonZeroUsize,
    ) -> std::io::Result<EngineReport> {
        let mut cmd = Command::new("make");
        cmd.current_dir(dir).arg(format!("-j{parallelism}"));
        if target == BuildTarget::Clean {
            cmd.arg("clean");
        }

        let result = cmd.output()?;
        let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&result.stderr));

        Ok(EngineReport {
            success: result.status.success(),
            output,
        })
    }
}

/// Materializes a generated unit under `root` and drives the engine's
/// build system over it.
///
/// # Errors
///
/// - `Io` if the unit cannot be written or the engine cannot be invoked
/// - `BuildFailed` carrying the engine's diagnostic output verbatim when
///   any invocation (clean included) exits unsuccessfully
pub fn build(
    unit: &GeneratedUnit,
    root: &Path,
    options: &BuildOptions,
    engine: &dyn BuildEngine,
) -> Result<BuildReport> {
    let dir = unit.materialize(root)?;

    if options.clean_first {
        info!(dir = %dir.display(), "cleaning previous build");
        run_target(unit, engine, &dir, BuildTarget::Clean, options.parallelism)?;
    }

    info!(
        dir = %dir.display(),
        jobs = options.parallelism.get(),
        mode = %unit.build_mode,
        "building '{}'",
        unit.executable_name
    );
    let report = run_target(unit, engine, &dir, BuildTarget::All, options.parallelism)?;

    Ok(BuildReport {
        executable: dir.join(&unit.executable_name),
        output: report.output,
    })
}

fn run_target(
    unit: &GeneratedUnit,
    engine: &dyn BuildEngine,
    dir: &Path,
    target: BuildTarget,
    parallelism: NonZeroUsize,
) -> Result<EngineReport> {
    let report = engine
        .invoke(dir, target, parallelism)
        .map_err(|source| ForgeError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    if !report.success {
        return Err(ForgeError::BuildFailed {
            project: unit.executable_name.clone(),
            output: report.output,
        });
    }
    Ok(report)
}

pub mod mock {
    //! Mock build engine for testing.
    //!
    //! Available for integration tests and external test crates.

    use super::*;
    use std::sync::Mutex;

    /// Behavior specification for the mock engine.
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Every invocation succeeds with the given output.
        Succeeds { output: String },
        /// The `All` target fails with the given diagnostic output;
        /// `Clean` still succeeds.
        FailsToCompile { output: String },
        /// Every invocation fails, `clean` included.
        FailsToClean { output: String },
    }

    /// Mock engine recording invocations without spawning processes.
    pub struct MockEngine {
        behavior: MockBehavior,
        invocations: Mutex<Vec<(PathBuf, BuildTarget, NonZeroUsize)>>,
    }

    impl MockEngine {
        /// Creates a mock with the given behavior.
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                invocations: Mutex::new(Vec::new()),
            }
        }

        /// Invocations seen so far, for verification.
        pub fn invocations(&self) -> Vec<(PathBuf, BuildTarget, NonZeroUsize)> {
            self.invocations
                .lock()
                .expect("MockEngine invocations mutex poisoned")
                .clone()
        }
    }

    impl BuildEngine for MockEngine {
        fn invoke(
            &self,
            dir: &Path,
            target: BuildTarget,
            parallelism: NonZeroUsize,
        ) -> std::io::Result<EngineReport> {
            self.invocations
                .lock()
                .expect("MockEngine invocations mutex poisoned")
                .push((dir.to_path_buf(), target, parallelism));

            let report = match &self.behavior {
                MockBehavior::Succeeds { output } => EngineReport {
                    success: true,
                    output: output.clone(),
                },
                MockBehavior::FailsToCompile { output } => EngineReport {
                    success: target == BuildTarget::Clean,
                    output: output.clone(),
                },
                MockBehavior::FailsToClean { output } => EngineReport {
                    success: false,
                    output: output.clone(),
                },
            };
            Ok(report)
        }
    }
}
