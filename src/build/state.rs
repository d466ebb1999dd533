use crate::config::{BoundaryChecks, PackageDescriptor};
use crate::deps::DependencyInfo;
use crate::error::BuildError;
use crate::log::Logger;
use crate::toolchain::{self, Platform};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-package scratch directory, relative to the package root.
pub const WORK_DIR: &str = ".lattice";

/// Options for [`BuildState::init`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Wipe the work directory before building.
    pub clean: bool,
    /// Prepare the root package for JIT execution instead of writing an artifact.
    pub jit: bool,
    /// Compiler binary to use instead of the bundled one.
    pub compiler: Option<PathBuf>,
    /// Target platform. Defaults to the host.
    pub platform: Option<Platform>,
}

/// Mutable record of one build run.
///
/// Created once per invocation by [`BuildState::init`], mutated only by the
/// orchestrator, discarded when the run ends.
#[derive(Debug)]
pub struct BuildState {
    built: HashSet<String>,
    pub root: PackageDescriptor,
    pub compiler_path: PathBuf,
    pub platform: Platform,
    /// Where dependencies built as libraries are written.
    pub library_container: PathBuf,
    /// Set when the root asks for `app+deps` boundary checks.
    pub force_boundary_checks_for_deps: bool,
    pub jit: bool,
    jit_ready: bool,
    /// Direct dependencies of the root, as resolved during the build.
    pub dependencies: Vec<DependencyInfo>,
}

impl BuildState {
    /// Load the root package, prepare its work directory and locate the compiler.
    pub fn init(
        root: &Path,
        options: InitOptions,
        log: &mut dyn Logger,
    ) -> Result<Self, BuildError> {
        let platform = match options.platform {
            Some(p) => p,
            None => Platform::host()?,
        };
        let compiler_path = match options.compiler {
            Some(path) => toolchain::existing_compiler(path)?,
            None => toolchain::locate_compiler()?,
        };

        let root = PackageDescriptor::load(root, log)?;
        prepare_environment(&root, options.clean)?;

        Ok(Self::new(root, compiler_path, platform, options.jit))
    }

    /// Build state for an already-loaded root. Touches nothing on disk.
    pub fn new(root: PackageDescriptor, compiler_path: PathBuf, platform: Platform, jit: bool) -> Self {
        Self {
            built: HashSet::new(),
            library_container: work_dir(&root).join("lib"),
            force_boundary_checks_for_deps: root.build.boundary_checks
                == BoundaryChecks::AppAndDeps,
            root,
            compiler_path,
            platform,
            jit,
            jit_ready: false,
            dependencies: Vec::new(),
        }
    }

    pub fn is_built(&self, name: &str) -> bool {
        self.built.contains(name)
    }

    pub(crate) fn mark_built(&mut self, name: &str) {
        self.built.insert(name.to_string());
    }

    pub fn built(&self) -> &HashSet<String> {
        &self.built
    }

    /// True once the root package's build step was reached in JIT mode.
    pub fn is_jit_ready(&self) -> bool {
        self.jit_ready
    }

    pub(crate) fn mark_jit_ready(&mut self) {
        self.jit_ready = true;
    }
}

pub fn work_dir(package: &PackageDescriptor) -> PathBuf {
    package.root.join(WORK_DIR)
}

/// Create the package's work directory, wiping it first when `clean` is set.
pub fn prepare_environment(package: &PackageDescriptor, clean: bool) -> Result<(), BuildError> {
    let dir = work_dir(package);
    if dir.exists() {
        if clean {
            fs::remove_dir_all(&dir)?;
            fs::create_dir_all(&dir)?;
        }
    } else {
        fs::create_dir_all(&dir)?;
    }
    Ok(())
}
