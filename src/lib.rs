//! # lattice - C packages, built dependency-first
//!
//! lattice builds C packages distributed through npm. A package declares its
//! entrypoint and C library dependencies in `package.json`; lattice resolves
//! the dependencies from `node_modules`, builds each one exactly once with the
//! bundled Tiny C Compiler, and then either writes the package's artifact to
//! disk or runs it directly (JIT).
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a new package
//! lattice init my-app
//!
//! # Compile and run it in memory
//! cd my-app && lattice run
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Manifest parsing (`package.json`)
//! - [`deps`] - Dependency resolution
//! - [`build`] - Build planning, argument assembly and orchestration
//! - [`toolchain`] - Bundled compiler location
//! - [`log`] - Task-based build reporting

/// Build planning, argument assembly and orchestration.
pub mod build;

/// CLI command handlers extracted from main.
pub mod commands;

/// Manifest parsing (`package.json`).
pub mod config;

/// Dependency resolution.
pub mod deps;

/// Error types.
pub mod error;

/// Task-based build reporting.
pub mod log;

/// Package templates for `lattice init`.
pub mod templates;

/// Bundled compiler location.
pub mod toolchain;

/// Dependency tree visualization.
pub mod tree;

pub use error::{BuildError, Severity};
