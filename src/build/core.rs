use super::args;
use super::feedback::FeedbackAnalyzer;
use super::plan::{self, BuildStep};
use super::process::{OutputMode, run_compiler};
use super::state::BuildState;
use crate::config::{ArtifactKind, PackageDescriptor};
use crate::error::BuildError;
use crate::log::Logger;
use std::fs;

/// What happened to the package a build was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Compiled (or prepared for JIT) during this call.
    Built,
    /// Already built earlier in this run; nothing was done.
    AlreadyBuilt,
    /// A dependency could not be resolved; the package was not built.
    Aborted,
}

// --- CORE: Build Package ---
/// Build `package` and, first, everything it depends on.
///
/// Each package is compiled at most once per run, no matter how many
/// dependents share it. Malformed dependencies and compiler failures are
/// reported through `log`; only fatal errors are returned.
pub fn build(
    state: &mut BuildState,
    package: &PackageDescriptor,
    is_dependency: bool,
    log: &mut dyn Logger,
) -> Result<BuildOutcome, BuildError> {
    if state.is_built(&package.name) {
        return Ok(BuildOutcome::AlreadyBuilt);
    }

    let plan = plan::plan(state.built(), package, is_dependency, log)?;
    if !is_dependency {
        state.dependencies.extend(plan.root_dependencies.iter().cloned());
    }

    for step in &plan.steps {
        execute_step(state, step, log)?;
    }

    if plan.is_aborted(&package.name) {
        log.error(&format!(
            "\"{}\" was not built because one of its dependencies is malformed.",
            package.name
        ));
        Ok(BuildOutcome::Aborted)
    } else {
        Ok(BuildOutcome::Built)
    }
}

/// Build the run's root package.
pub fn build_root(state: &mut BuildState, log: &mut dyn Logger) -> Result<BuildOutcome, BuildError> {
    let root = state.root.clone();
    build(state, &root, false, log)
}

fn execute_step(
    state: &mut BuildState,
    step: &BuildStep,
    log: &mut dyn Logger,
) -> Result<(), BuildError> {
    let package = &step.package;
    if state.is_built(&package.name) {
        return Ok(());
    }

    if !step.dependencies.is_empty() && !state.library_container.exists() {
        fs::create_dir_all(&state.library_container)?;
    }

    if state.jit && !step.is_dependency && package.name == state.root.name {
        // The root is compiled in memory later by `run_jit`.
        state.mark_jit_ready();
        state.mark_built(&package.name);
        return Ok(());
    }

    if package.build.kind == ArtifactKind::Binary && package.build.jit_only && !state.jit {
        return Err(BuildError::JitOnlyViolation(package.name.clone()));
    }

    log.task(&format!("Building {}", package.name));

    let args = args::assemble(state, package, &step.dependencies, step.is_dependency);
    if let Some(dir) = args.output_path().as_deref().and_then(|p| p.parent()) {
        fs::create_dir_all(dir)?;
    }

    log.status(&format!("Compiling {}", package.name));
    match run_compiler(
        &state.compiler_path,
        &args.into_build_args(),
        &package.name,
        OutputMode::Captured,
    ) {
        Ok(output) => {
            let output = output.trim();
            if !output.is_empty() {
                log.warn(output);
            }
            log.status(&format!("Built {}", package.name));
        }
        Err(e @ BuildError::CompilationFailure { .. }) => {
            report_failure(&e, log);
            log.status(&format!("Failed to build {}", package.name));
        }
        Err(e) => return Err(e),
    }

    // Marked even after a failed compile: the compiler was invoked.
    state.mark_built(&package.name);
    Ok(())
}

fn report_failure(error: &BuildError, log: &mut dyn Logger) {
    log.error(&error.to_string());
    if let BuildError::CompilationFailure { output, .. } = error {
        let output = output.trim();
        if !output.is_empty() {
            log.error(output);
        }
        if let Some(hint) = FeedbackAnalyzer::analyze(output) {
            log.info(&hint);
        }
    }
}

// --- COMMAND: Run (JIT) ---
/// Compile and run the root package in memory, forwarding `runtime_args`.
///
/// Only valid after [`build`] prepared the root in JIT mode.
pub fn run_jit(
    state: &BuildState,
    runtime_args: &[String],
    log: &mut dyn Logger,
) -> Result<(), BuildError> {
    if !state.is_jit_ready() {
        return Err(BuildError::JitNotReady);
    }

    log.task(&format!("Running {}", state.root.name));
    log.finish();

    let args = args::assemble(state, &state.root, &state.dependencies, false)
        .into_run_args(runtime_args);
    match run_compiler(
        &state.compiler_path,
        &args,
        &state.root.name,
        OutputMode::Inherit,
    ) {
        Ok(_) => Ok(()),
        // With `-run` the exit status is the program's own.
        Err(BuildError::CompilationFailure { package, code, .. }) => {
            Err(BuildError::ProgramExit { package, code })
        }
        Err(e) => Err(e),
    }
}
