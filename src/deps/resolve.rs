use crate::config::{MANIFEST_FILE, Manifest, PackageDescriptor};
use crate::error::BuildError;
use crate::log::Logger;
use std::path::{Path, PathBuf};

pub const DEPENDENCY_DIR: &str = "node_modules";

/// A resolved dependency: its descriptor plus its absolute exported include dirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyInfo {
    pub package: PackageDescriptor,
    pub include_dirs: Vec<PathBuf>,
}

/// Outcome of resolving every dependency a package declares.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Usable dependencies, in declaration order.
    pub dependencies: Vec<DependencyInfo>,
    /// One [`BuildError::MalformedDependency`] per dependency that could not be used.
    pub malformed: Vec<BuildError>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// On-disk location of dependency `name` for the package rooted at `root`.
pub fn dependency_path(root: &Path, name: &str) -> PathBuf {
    let base = root.join(DEPENDENCY_DIR);
    match name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((scope, real_name)) => base.join(format!("@{}", scope)).join(real_name),
        None => base.join(name),
    }
}

/// Resolve every dependency `package` declares, in declaration order.
///
/// Malformed dependencies are collected rather than returned early so that
/// their siblings can still be built. Any other error is fatal.
pub fn resolve_dependencies(
    package: &PackageDescriptor,
    log: &mut dyn Logger,
) -> Result<Resolution, BuildError> {
    let mut resolution = Resolution::default();

    for name in package.dependencies.keys() {
        match resolve_dependency(package, name, log) {
            Ok(Some(info)) => resolution.dependencies.push(info),
            Ok(None) => {}
            Err(e) if e.is_recoverable() => resolution.malformed.push(e),
            Err(e) => return Err(e),
        }
    }

    Ok(resolution)
}

/// Resolve a single dependency of `package`.
///
/// Returns `Ok(None)` when the dependency exports no headers: it is skipped
/// with a warning instead of failing the build.
pub fn resolve_dependency(
    package: &PackageDescriptor,
    name: &str,
    log: &mut dyn Logger,
) -> Result<Option<DependencyInfo>, BuildError> {
    let dep_root = dependency_path(&package.root, name);

    let manifest_path = dep_root.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(BuildError::MalformedDependency(format!(
            "\"{}\" depends on \"{}\", which lacks a {} (malformed dependency?)",
            package.name, name, MANIFEST_FILE
        )));
    }

    let manifest = Manifest::read(&dep_root).map_err(|e| {
        BuildError::MalformedDependency(format!(
            "\"{}\" depends on \"{}\", which has an unreadable manifest: {}",
            package.name, name, e
        ))
    })?;

    if !manifest.is_c_library() {
        return Err(BuildError::MalformedDependency(format!(
            "\"{}\" depends on \"{}\", which isn't a C library. If your project depends on JavaScript libraries, install them as devDependencies.",
            package.name, name
        )));
    }

    let dependency = PackageDescriptor::from_manifest(std::path::absolute(&dep_root)?, manifest, log)?;
    if dependency.exports.is_empty() {
        log.warn(&format!("Dependency \"{}\" does not export any headers.", name));
        return Ok(None);
    }

    let include_dirs = dependency
        .exports
        .iter()
        .map(|dir| dependency.root.join(dir))
        .collect();

    Ok(Some(DependencyInfo {
        package: dependency,
        include_dirs,
    }))
}
