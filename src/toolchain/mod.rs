//! Toolchain location.
//!
//! lattice ships a Tiny C Compiler build per platform next to its own
//! executable. The compiler is looked up at a fixed path under the
//! installation root; there is no PATH-based discovery.

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// Overrides the installation root.
pub const HOME_ENV: &str = "LATTICE_HOME";

/// Overrides the compiler binary path entirely.
pub const COMPILER_ENV: &str = "LATTICE_TCC";

/// Platforms lattice can build for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Result<Self, BuildError> {
        match os {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(BuildError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn host() -> Result<Self, BuildError> {
        Self::from_os(std::env::consts::OS)
    }

    pub fn executable_suffix(&self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            Platform::Linux => "",
        }
    }

    /// Compiler location relative to the installation root.
    pub fn compiler_relative_path(&self) -> PathBuf {
        match self {
            Platform::Windows => Path::new("tcc").join("win64").join("tcc.exe"),
            Platform::Linux => Path::new("tcc").join("linux").join("tcc"),
        }
    }
}

/// Directory lattice is installed in: `$LATTICE_HOME`, or the directory of
/// the running executable.
pub fn install_root() -> Result<PathBuf, BuildError> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(std::path::absolute(PathBuf::from(home))?);
    }
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Compiler path for `platform` under `install_root`. Fails if the binary is missing.
pub fn compiler_path(install_root: &Path, platform: Platform) -> Result<PathBuf, BuildError> {
    let path = install_root.join(platform.compiler_relative_path());
    if !path.exists() {
        return Err(BuildError::CompilerNotFound(path));
    }
    Ok(path)
}

/// Absolute path of an explicitly configured compiler. Relative paths are
/// resolved against the current directory, not the compiler's.
pub fn existing_compiler(path: PathBuf) -> Result<PathBuf, BuildError> {
    if !path.exists() {
        return Err(BuildError::CompilerNotFound(path));
    }
    Ok(std::path::absolute(path)?)
}

/// Locate the compiler for the host platform, honouring `$LATTICE_TCC`.
pub fn locate_compiler() -> Result<PathBuf, BuildError> {
    let platform = Platform::host()?;
    if let Some(explicit) = std::env::var_os(COMPILER_ENV) {
        return existing_compiler(PathBuf::from(explicit));
    }
    compiler_path(&install_root()?, platform)
}
