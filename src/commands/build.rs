//! `lattice build` and `lattice run`.

use crate::build::{self, BuildOutcome, BuildState, InitOptions};
use crate::log::{ConsoleLogger, Logger};
use anyhow::Result;
use colored::*;
use std::path::Path;
use std::time::Instant;

/// Build the package at `root` and its dependencies. Returns `false` if
/// anything failed along the way.
pub fn handle_build(root: &Path, clean: bool) -> Result<bool> {
    let start_time = Instant::now();
    let mut log = ConsoleLogger::new();

    let options = InitOptions {
        clean,
        ..Default::default()
    };
    let result = BuildState::init(root, options, &mut log)
        .and_then(|mut state| build::build_root(&mut state, &mut log));
    log.finish();

    let outcome = result?;
    if outcome == BuildOutcome::Aborted || log.error_count() > 0 {
        println!(
            "{} Build failed with {} error{}",
            "x".red(),
            log.error_count(),
            if log.error_count() == 1 { "" } else { "s" }
        );
        return Ok(false);
    }

    println!(
        "{} Build finished in {:.2?}",
        "✓".green(),
        start_time.elapsed()
    );
    Ok(true)
}

/// Build the dependencies of the package at `root`, then compile and run the
/// package itself in memory.
pub fn handle_run(root: &Path, clean: bool, run_args: &[String]) -> Result<bool> {
    let mut log = ConsoleLogger::new();

    let options = InitOptions {
        clean,
        jit: true,
        ..Default::default()
    };
    let mut state = match BuildState::init(root, options, &mut log) {
        Ok(state) => state,
        Err(e) => {
            log.finish();
            return Err(e.into());
        }
    };

    let outcome = build::build_root(&mut state, &mut log);
    log.finish();
    if outcome? == BuildOutcome::Aborted || log.error_count() > 0 {
        println!("{} Not running: the build reported errors.", "x".red());
        return Ok(false);
    }

    println!("{} Running...\n", "▶".green());
    match build::run_jit(&state, run_args, &mut log) {
        Ok(()) => Ok(true),
        Err(e) if e.is_recoverable() => {
            println!("{} {}", "x".red(), e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
