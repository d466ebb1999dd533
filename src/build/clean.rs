//! Build artifact cleanup.
//!
//! `lattice clean` removes the package's `.lattice` work directory (which
//! holds built dependency libraries) and its configured output directory.

use super::state::work_dir;
use crate::config::PackageDescriptor;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Remove build outputs of `package`. Returns `true` if anything was removed.
pub fn clean(package: &PackageDescriptor) -> Result<bool> {
    let mut cleaned = false;

    let work = work_dir(package);
    if work.exists() {
        fs::remove_dir_all(&work)
            .with_context(|| format!("Failed to remove {}", work.display()))?;
        println!("{} Removed {}", "🗑️".red(), work.display());
        cleaned = true;
    }

    let out = normalize(&package.output_dir());
    let root = normalize(&package.root);
    if out.exists() {
        // Only directories strictly inside the package are removed.
        if out.starts_with(&root) && out != root {
            fs::remove_dir_all(&out)
                .with_context(|| format!("Failed to remove {}", out.display()))?;
            println!("{} Removed {}", "🗑️".red(), out.display());
            cleaned = true;
        } else {
            println!(
                "{} Skipping output directory {}: it is not inside the package",
                "!".yellow(),
                out.display()
            );
        }
    }

    if cleaned {
        println!("{} Clean complete.", "✓".green());
    } else {
        println!("{} Nothing to clean", "!".yellow());
    }
    Ok(cleaned)
}

/// Lexically resolve `.` and `..` components. Symlinks are not followed.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
