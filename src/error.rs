//! Error types for the build pipeline.
//!
//! Every failure the orchestrator can hit is a [`BuildError`]. Callers decide
//! what to do with one through [`BuildError::severity`]: fatal errors halt the
//! run, recoverable ones are reported and only abandon the package (or
//! subtree) they belong to.

use std::path::PathBuf;
use thiserror::Error;

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Propagates and halts the whole run.
    Fatal,
    /// Reported through the logger; only the current subtree is abandoned.
    Recoverable,
}

#[derive(Debug, Error)]
pub enum BuildError {
    /// Missing or unparsable manifest, missing or non-C entrypoint.
    #[error("{0}")]
    Config(String),

    /// A declared dependency is not a manifest-bearing C library.
    #[error("{0}")]
    MalformedDependency(String),

    #[error("Unsupported platform \"{0}\".")]
    UnsupportedPlatform(String),

    #[error("Unable to find compiler at \"{}\".", .0.display())]
    CompilerNotFound(PathBuf),

    #[error("\"{0}\" is a jit-only binary and can't be built ahead of time. Use `lattice run` instead.")]
    JitOnlyViolation(String),

    /// The compiler ran and exited with a non-zero status.
    #[error("Compilation of \"{package}\" failed ({})", exit_label(.code))]
    CompilationFailure {
        package: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Failed to launch compiler \"{}\"", .path.display())]
    CompilerLaunch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program started by a JIT run exited with a non-zero status.
    #[error("\"{package}\" exited with {}", exit_label(.code))]
    ProgramExit { package: String, code: Option<i32> },

    #[error("The root package has not been prepared for JIT execution.")]
    JitNotReady,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub fn severity(&self) -> Severity {
        match self {
            BuildError::MalformedDependency(_)
            | BuildError::CompilationFailure { .. }
            | BuildError::ProgramExit { .. } => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "terminated by signal".to_string(),
    }
}
