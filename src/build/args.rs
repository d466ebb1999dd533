//! Compiler argument assembly.
//!
//! [`assemble`] is pure: the same state, package and dependency list always
//! produce the same arguments, and nothing is touched on disk.

use super::state::BuildState;
use crate::config::{BoundaryChecks, CharSignedness, PackageDescriptor, Subsystem};
use crate::deps::DependencyInfo;
use crate::toolchain::Platform;
use std::path::PathBuf;

/// Assembled invocation for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerArgs {
    pub entrypoint: PathBuf,
    /// Artifact kind and destination (`-static -shared -o ...` or `-o ...`).
    pub output: Vec<String>,
    /// Include paths, code generation flags and passthrough arguments.
    pub flags: Vec<String>,
}

impl CompilerArgs {
    /// Ahead-of-time invocation: entrypoint first, then output, then flags.
    pub fn into_build_args(self) -> Vec<String> {
        let mut args = Vec::with_capacity(1 + self.output.len() + self.flags.len());
        args.push(self.entrypoint.to_string_lossy().to_string());
        args.extend(self.output);
        args.extend(self.flags);
        args
    }

    /// Direct-run invocation. No artifact is written; `-run` must directly
    /// precede the source file and everything after it goes to the program.
    pub fn into_run_args(self, runtime_args: &[String]) -> Vec<String> {
        let mut args = self.flags;
        args.push("-run".to_string());
        args.push(self.entrypoint.to_string_lossy().to_string());
        args.extend(runtime_args.iter().cloned());
        args
    }

    /// Path passed to `-o`, if any.
    pub fn output_path(&self) -> Option<PathBuf> {
        let idx = self.output.iter().position(|a| a == "-o")?;
        self.output.get(idx + 1).map(PathBuf::from)
    }
}

/// Artifact path for `package`.
pub fn artifact_path(state: &BuildState, package: &PackageDescriptor, is_dependency: bool) -> PathBuf {
    let stem = package.artifact_stem();
    if package.is_library() {
        let dir = if is_dependency {
            state.library_container.clone()
        } else {
            package.output_dir()
        };
        dir.join(format!("{}.a", stem))
    } else {
        package
            .output_dir()
            .join(format!("{}{}", stem, state.platform.executable_suffix()))
    }
}

pub fn assemble(
    state: &BuildState,
    package: &PackageDescriptor,
    dependencies: &[DependencyInfo],
    is_dependency: bool,
) -> CompilerArgs {
    let mut output = Vec::new();
    if package.is_library() {
        output.push("-static".to_string());
        output.push("-shared".to_string());
    }
    output.push("-o".to_string());
    output.push(
        artifact_path(state, package, is_dependency)
            .to_string_lossy()
            .to_string(),
    );

    let mut flags = Vec::new();

    // Own imports first, then dependency exports.
    for dir in &package.imports {
        let dir = if dir.is_absolute() {
            dir.clone()
        } else {
            package.root.join(dir)
        };
        flags.push(format!("-I{}", dir.display()));
    }
    for dep in dependencies {
        for dir in &dep.include_dirs {
            flags.push(format!("-I{}", dir.display()));
        }
    }

    flags.push(
        match package.compiler.char_signedness {
            CharSignedness::Signed => "-fsigned-char",
            CharSignedness::Unsigned => "-funsigned-char",
        }
        .to_string(),
    );

    if package.compiler.dollars_in_names {
        flags.push("-fdollars-in-identifiers".to_string());
    }

    if package.build.boundary_checks != BoundaryChecks::None
        || (is_dependency && state.force_boundary_checks_for_deps)
    {
        flags.push("-b".to_string());
    }

    if state.platform == Platform::Windows && !package.is_library() {
        let subsystem = match package.build.winpe {
            Subsystem::Console => "console",
            Subsystem::Gui => "gui",
        };
        flags.push(format!("-Wl,-subsystem={}", subsystem));
        flags.push("-mms-bitfields".to_string());
    }

    flags.extend(package.compiler.additional_arguments.iter().cloned());

    CompilerArgs {
        entrypoint: package.entrypoint_path(),
        output,
        flags,
    }
}
