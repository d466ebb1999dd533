//! Dependency resolution.
//!
//! Dependencies are C library packages installed next to the package that
//! declares them:
//!
//! - `name` lives in `node_modules/name`
//! - `@scope/name` lives in `node_modules/@scope/name`
//!
//! Only the direct dependencies of a package are resolved here. The build
//! orchestrator resolves a dependency's own dependencies when it builds it.

mod resolve;

pub use resolve::{
    DEPENDENCY_DIR, DependencyInfo, Resolution, dependency_path, resolve_dependencies,
    resolve_dependency,
};
