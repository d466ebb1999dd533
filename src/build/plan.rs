//! Dependency-first build planning.
//!
//! The planner walks the dependency graph depth-first and records every
//! package that has to be compiled, each after all of its dependencies. The
//! result is an inspectable [`BuildPlan`]; executing it is the
//! orchestrator's job.

use crate::config::PackageDescriptor;
use crate::deps::{self, DependencyInfo};
use crate::error::BuildError;
use crate::log::Logger;
use std::collections::HashSet;

/// One package to build, with the dependencies its arguments are assembled from.
#[derive(Debug, Clone)]
pub struct BuildStep {
    pub package: PackageDescriptor,
    pub dependencies: Vec<DependencyInfo>,
    pub is_dependency: bool,
}

#[derive(Debug, Default)]
pub struct BuildPlan {
    /// Packages in build order. Every package appears after its dependencies.
    pub steps: Vec<BuildStep>,
    /// Packages that can't be built: a dependency was malformed or itself aborted.
    pub aborted: HashSet<String>,
    /// Direct dependencies of the package the plan was made for.
    pub root_dependencies: Vec<DependencyInfo>,
}

impl BuildPlan {
    pub fn package_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.package.name.as_str()).collect()
    }

    pub fn is_aborted(&self, name: &str) -> bool {
        self.aborted.contains(name)
    }
}

enum Visit {
    Planned,
    Aborted,
}

struct Planner<'a> {
    /// Packages built by earlier runs of the orchestrator; never replanned.
    built: &'a HashSet<String>,
    planned: HashSet<String>,
    visiting: Vec<String>,
    plan: BuildPlan,
}

/// Plan the build of `package` and everything it depends on.
///
/// Malformed dependencies are reported through `log` and abort only the
/// packages that need them. Any other error is fatal.
pub fn plan(
    built: &HashSet<String>,
    package: &PackageDescriptor,
    is_dependency: bool,
    log: &mut dyn Logger,
) -> Result<BuildPlan, BuildError> {
    let mut planner = Planner {
        built,
        planned: HashSet::new(),
        visiting: Vec::new(),
        plan: BuildPlan::default(),
    };
    planner.visit(package, is_dependency, true, log)?;
    Ok(planner.plan)
}

impl Planner<'_> {
    fn visit(
        &mut self,
        package: &PackageDescriptor,
        is_dependency: bool,
        is_root: bool,
        log: &mut dyn Logger,
    ) -> Result<Visit, BuildError> {
        let name = package.name.as_str();
        if self.built.contains(name) || self.planned.contains(name) {
            return Ok(Visit::Planned);
        }
        if self.plan.aborted.contains(name) {
            return Ok(Visit::Aborted);
        }

        self.visiting.push(name.to_string());
        let resolution = deps::resolve_dependencies(package, log)?;
        let mut aborted = !resolution.is_clean();
        for e in &resolution.malformed {
            log.error(&e.to_string());
        }

        for dep in &resolution.dependencies {
            if self.visiting.iter().any(|n| n == &dep.package.name) {
                log.error(
                    &BuildError::MalformedDependency(format!(
                        "\"{}\" depends on \"{}\", which forms a dependency cycle.",
                        name, dep.package.name
                    ))
                    .to_string(),
                );
                aborted = true;
                continue;
            }
            if let Visit::Aborted = self.visit(&dep.package, true, false, log)? {
                aborted = true;
            }
        }
        self.visiting.pop();

        if is_root {
            self.plan.root_dependencies = resolution.dependencies.clone();
        }

        if aborted {
            self.plan.aborted.insert(name.to_string());
            return Ok(Visit::Aborted);
        }

        self.planned.insert(name.to_string());
        self.plan.steps.push(BuildStep {
            package: package.clone(),
            dependencies: resolution.dependencies,
            is_dependency,
        });
        Ok(Visit::Planned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MANIFEST_FILE;
    use crate::deps::dependency_path;
    use crate::log::CaptureLogger;
    use std::fs;
    use std::path::Path;

    fn package(dir: &Path, name: &str, lib: bool, deps: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        let deps: Vec<String> = deps.iter().map(|d| format!("\"{}\": \"*\"", d)).collect();
        let lattice = if lib {
            r#"{ "exports": ["include"], "buildOptions": { "type": "lib" } }"#
        } else {
            "{}"
        };
        fs::write(
            dir.join(MANIFEST_FILE),
            format!(
                r#"{{ "name": "{}", "main": "main.c", "dependencies": {{ {} }}, "lattice": {} }}"#,
                name,
                deps.join(", "),
                lattice
            ),
        )
        .unwrap();
    }

    fn load(dir: &Path) -> PackageDescriptor {
        PackageDescriptor::load(dir, &mut CaptureLogger::new()).unwrap()
    }

    #[test]
    fn test_diamond_plans_shared_library_once() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path();
        package(app, "app", false, &["left", "right"]);
        let left = dependency_path(app, "left");
        let right = dependency_path(app, "right");
        package(&left, "left", true, &["core"]);
        package(&right, "right", true, &["core"]);
        package(&dependency_path(&left, "core"), "core", true, &[]);
        package(&dependency_path(&right, "core"), "core", true, &[]);

        let mut log = CaptureLogger::new();
        let plan = plan(&HashSet::new(), &load(app), false, &mut log).unwrap();
        assert_eq!(plan.package_names(), vec!["core", "left", "right", "app"]);
        assert!(plan.aborted.is_empty());
        assert!(!plan.steps[3].is_dependency);
        assert!(plan.steps[..3].iter().all(|s| s.is_dependency));
        assert_eq!(plan.root_dependencies.len(), 2);
    }

    #[test]
    fn test_already_built_packages_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path();
        package(app, "app", false, &["mathlib"]);
        package(&dependency_path(app, "mathlib"), "mathlib", true, &[]);

        let built: HashSet<String> = ["mathlib".to_string()].into_iter().collect();
        let plan = plan(&built, &load(app), false, &mut CaptureLogger::new()).unwrap();
        assert_eq!(plan.package_names(), vec!["app"]);
        assert_eq!(plan.steps[0].dependencies.len(), 1);
    }

    #[test]
    fn test_malformed_dependency_aborts_branch_only() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path();
        package(app, "app", false, &["good", "wrapper"]);
        package(&dependency_path(app, "good"), "good", true, &[]);
        let wrapper = dependency_path(app, "wrapper");
        package(&wrapper, "wrapper", true, &["ghost"]);
        fs::create_dir_all(dependency_path(&wrapper, "ghost")).unwrap();

        let mut log = CaptureLogger::new();
        let plan = plan(&HashSet::new(), &load(app), false, &mut log).unwrap();
        assert_eq!(plan.package_names(), vec!["good"]);
        assert!(plan.is_aborted("wrapper"));
        assert!(plan.is_aborted("app"));
        assert_eq!(log.errors.len(), 1);
        assert!(log.errors[0].contains("ghost"));
    }

    #[test]
    fn test_cycle_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path();
        package(app, "app", false, &["a"]);
        let a = dependency_path(app, "a");
        package(&a, "a", true, &["b"]);
        let b = dependency_path(&a, "b");
        package(&b, "b", true, &["a"]);
        package(&dependency_path(&b, "a"), "a", true, &["b"]);

        let mut log = CaptureLogger::new();
        let plan = plan(&HashSet::new(), &load(app), false, &mut log).unwrap();
        assert!(plan.steps.is_empty());
        assert!(plan.is_aborted("app"));
        assert!(log.errors.iter().any(|e| e.contains("cycle")));
    }

    #[test]
    fn test_dependencies_follow_declaration_order() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path();
        package(app, "app", false, &["zeta", "alpha"]);
        package(&dependency_path(app, "zeta"), "zeta", true, &[]);
        package(&dependency_path(app, "alpha"), "alpha", true, &[]);

        let plan = plan(&HashSet::new(), &load(app), false, &mut CaptureLogger::new()).unwrap();
        assert_eq!(plan.package_names(), vec!["zeta", "alpha", "app"]);
        let app_step = &plan.steps[2];
        assert_eq!(app_step.dependencies[0].package.name, "zeta");
        assert_eq!(app_step.dependencies[1].package.name, "alpha");
    }
}
