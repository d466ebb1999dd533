//! Dependency tree visualization.
//!
//! `lattice tree` lists the package's direct dependencies and whether each
//! one resolves to a usable C library.
//!
//! ## Example Output
//!
//! ```text
//! app v1.0.0
//! ├── mathlib ^1.2.0 (lib, 1 export)
//! ├── left-pad ^1.3.0 (not a C library)
//! └── @acme/vec ^0.3.0 (missing)
//! ```

use crate::config::{MANIFEST_FILE, Manifest, PackageDescriptor};
use crate::deps::dependency_path;
use anyhow::Result;
use colored::*;

/// Status of one declared dependency, as shown by `lattice tree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    Library { exports: usize },
    NotCLibrary,
    Unreadable,
    Missing,
}

pub fn dependency_status(package: &PackageDescriptor, name: &str) -> DependencyStatus {
    let dir = dependency_path(&package.root, name);
    if !dir.join(MANIFEST_FILE).exists() {
        return DependencyStatus::Missing;
    }
    match Manifest::read(&dir) {
        Ok(m) if m.is_c_library() => DependencyStatus::Library {
            exports: m.lattice.map(|l| l.exports.len()).unwrap_or(0),
        },
        Ok(_) => DependencyStatus::NotCLibrary,
        Err(_) => DependencyStatus::Unreadable,
    }
}

pub fn print_tree(package: &PackageDescriptor) -> Result<()> {
    match &package.version {
        Some(v) => println!("{} v{}", package.name.bold().cyan(), v),
        None => println!("{}", package.name.bold().cyan()),
    }

    if package.dependencies.is_empty() {
        println!("└── (no dependencies)");
        return Ok(());
    }

    let count = package.dependencies.len();
    for (i, (name, version)) in package.dependencies.iter().enumerate() {
        let prefix = if i == count - 1 { "└──" } else { "├──" };
        let info = match dependency_status(package, name) {
            DependencyStatus::Library { exports: 0 } => "lib, no exports".yellow().to_string(),
            DependencyStatus::Library { exports } => format!(
                "lib, {} export{}",
                exports,
                if exports == 1 { "" } else { "s" }
            )
            .green()
            .to_string(),
            DependencyStatus::NotCLibrary => "not a C library".red().to_string(),
            DependencyStatus::Unreadable => "unreadable manifest".red().to_string(),
            DependencyStatus::Missing => "missing".red().to_string(),
        };
        println!("{} {} {} ({})", prefix, name.bold(), version.dimmed(), info);
    }

    Ok(())
}
