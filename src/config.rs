//! Package manifest parsing (`package.json`).
//!
//! A lattice package is an npm package whose `package.json` carries a
//! `lattice` namespace. [`PackageDescriptor::load`] reads it, validates the
//! entrypoint and resolves every default once, so nothing downstream ever
//! re-derives them.

use crate::error::BuildError;
use crate::log::Logger;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";
pub const DEFAULT_OUTDIR: &str = "./dist";

/// Raw `package.json`, as written on disk.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub version: Option<String>,
    pub main: Option<String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    pub lattice: Option<LatticeConfig>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LatticeConfig {
    pub outdir: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default)]
    pub build_options: BuildOptions,
    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArtifactKind {
    #[default]
    #[serde(rename = "bin")]
    Binary,
    #[serde(rename = "lib")]
    Library,
}

/// Windows PE subsystem. Ignored for libraries and on other platforms.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    #[default]
    Console,
    Gui,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryChecks {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "app")]
    App,
    #[serde(rename = "app+deps")]
    AppAndDeps,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CharSignedness {
    #[default]
    Signed,
    Unsigned,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub winpe: Subsystem,
    pub boundary_checks: BoundaryChecks,
    /// Only honoured for binaries: the program can only run through `lattice run`.
    pub jit_only: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    pub char_signedness: CharSignedness,
    pub dollars_in_names: bool,
    pub additional_arguments: Vec<String>,
}

impl Manifest {
    /// Read and parse the manifest of the package rooted at `root`.
    pub fn read(root: &Path) -> Result<Self, BuildError> {
        let path = root.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(BuildError::Config(format!(
                "Package file missing at \"{}\".",
                path.display()
            )));
        }
        let content = fs::read_to_string(&path).map_err(|e| {
            BuildError::Config(format!("Failed to read \"{}\": {}", path.display(), e))
        })?;
        Self::parse(&content).map_err(|e| {
            BuildError::Config(format!(
                "Error while parsing package file \"{}\": {}",
                path.display(),
                e
            ))
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// True when the manifest describes a C library a build can link against.
    pub fn is_c_library(&self) -> bool {
        let c_entry = self.main.as_deref().is_some_and(is_c_source);
        let lib = self
            .lattice
            .as_ref()
            .is_some_and(|l| l.build_options.kind == ArtifactKind::Library);
        c_entry && lib
    }
}

/// Fully-defaulted, validated view of a package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Absolute package root.
    pub root: PathBuf,
    pub name: String,
    pub version: Option<String>,
    /// Entrypoint as declared, relative to `root`.
    pub entrypoint: PathBuf,
    /// Declared dependency names mapped to their version requirement, in declaration order.
    pub dependencies: IndexMap<String, String>,
    pub build: BuildOptions,
    pub compiler: CompilerOptions,
    pub outdir: PathBuf,
    pub imports: Vec<PathBuf>,
    pub exports: Vec<PathBuf>,
}

impl PackageDescriptor {
    /// Load the package rooted at `root`.
    ///
    /// Fails with [`BuildError::Config`] when the manifest is missing or
    /// unparsable, or when the entrypoint is absent or not a `.c` file.
    pub fn load(root: &Path, log: &mut dyn Logger) -> Result<Self, BuildError> {
        let manifest = Manifest::read(root)?;
        let root = std::path::absolute(root)?;
        Self::from_manifest(root, manifest, log)
    }

    pub fn from_manifest(
        root: PathBuf,
        manifest: Manifest,
        log: &mut dyn Logger,
    ) -> Result<Self, BuildError> {
        let entrypoint = match manifest.main.as_deref() {
            None | Some("") => {
                return Err(BuildError::Config(format!(
                    "Package \"{}\" doesn't specify an entrypoint.",
                    manifest.name
                )));
            }
            Some(main) if !is_c_source(main) => {
                return Err(BuildError::Config(format!(
                    "Package entrypoint must be a C code file (*.c), found \"{}\".",
                    main
                )));
            }
            Some(main) => PathBuf::from(main),
        };

        let lattice = manifest.lattice.unwrap_or_default();
        let outdir = PathBuf::from(lattice.outdir.as_deref().unwrap_or(DEFAULT_OUTDIR));

        if lattice.build_options.kind == ArtifactKind::Library && lattice.exports.is_empty() {
            log.warn(&format!(
                "Library \"{}\" is not exporting any include paths. Add a directory to \"lattice.exports\" in {}.",
                manifest.name, MANIFEST_FILE
            ));
        }

        if lattice.imports.iter().any(|p| Path::new(p).is_absolute()) {
            log.warn(&format!(
                "Package \"{}\" imports absolute include paths. Prefer relative paths that point inside the package.",
                manifest.name
            ));
        }

        Ok(Self {
            root,
            name: manifest.name,
            version: manifest.version,
            entrypoint,
            dependencies: manifest.dependencies,
            build: lattice.build_options,
            compiler: lattice.compiler_options,
            outdir,
            imports: lattice.imports.into_iter().map(PathBuf::from).collect(),
            exports: lattice.exports.into_iter().map(PathBuf::from).collect(),
        })
    }

    pub fn is_library(&self) -> bool {
        self.build.kind == ArtifactKind::Library
    }

    /// Absolute path of the entrypoint source file.
    pub fn entrypoint_path(&self) -> PathBuf {
        self.root.join(&self.entrypoint)
    }

    /// Absolute path of the package's own output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.outdir)
    }

    /// File stem used for build artifacts: `@scope/name` becomes `scope-name`.
    pub fn artifact_stem(&self) -> String {
        self.name.trim_start_matches('@').replace('/', "-")
    }
}

pub fn is_c_source(path: &str) -> bool {
    path.ends_with(".c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::CaptureLogger;

    fn descriptor(json: &str, log: &mut CaptureLogger) -> Result<PackageDescriptor, BuildError> {
        let manifest = Manifest::parse(json).unwrap();
        PackageDescriptor::from_manifest(PathBuf::from("/work/pkg"), manifest, log)
    }

    #[test]
    fn test_defaults_resolved() {
        let mut log = CaptureLogger::new();
        let desc = descriptor(r#"{ "name": "app", "main": "./src/main.c" }"#, &mut log).unwrap();
        assert_eq!(desc.outdir, PathBuf::from("./dist"));
        assert_eq!(desc.build.kind, ArtifactKind::Binary);
        assert_eq!(desc.build.winpe, Subsystem::Console);
        assert_eq!(desc.build.boundary_checks, BoundaryChecks::None);
        assert!(!desc.build.jit_only);
        assert_eq!(desc.compiler.char_signedness, CharSignedness::Signed);
        assert!(!desc.compiler.dollars_in_names);
        assert!(desc.compiler.additional_arguments.is_empty());
        assert!(log.warns.is_empty());
    }

    #[test]
    fn test_partial_build_options_defaulted_per_field() {
        let mut log = CaptureLogger::new();
        let desc = descriptor(
            r#"{
                "name": "app",
                "main": "main.c",
                "lattice": { "buildOptions": { "boundaryChecks": "app+deps" } }
            }"#,
            &mut log,
        )
        .unwrap();
        assert_eq!(desc.build.boundary_checks, BoundaryChecks::AppAndDeps);
        assert_eq!(desc.build.kind, ArtifactKind::Binary);
        assert_eq!(desc.build.winpe, Subsystem::Console);
    }

    #[test]
    fn test_full_manifest() {
        let mut log = CaptureLogger::new();
        let desc = descriptor(
            r#"{
                "name": "@acme/vec",
                "version": "2.1.0",
                "main": "src/vec.c",
                "dependencies": { "zeta": "^1.0.0", "alpha": "^2.0.0" },
                "lattice": {
                    "outdir": "out",
                    "imports": ["vendor"],
                    "exports": ["include", "include/extra"],
                    "buildOptions": { "type": "lib", "winpe": "gui", "jitOnly": true },
                    "compilerOptions": {
                        "charSignedness": "unsigned",
                        "dollarsInNames": true,
                        "additionalArguments": ["-Wall", "-O2"]
                    }
                }
            }"#,
            &mut log,
        )
        .unwrap();

        assert!(desc.is_library());
        assert_eq!(desc.build.winpe, Subsystem::Gui);
        assert!(desc.build.jit_only);
        assert_eq!(desc.compiler.char_signedness, CharSignedness::Unsigned);
        assert!(desc.compiler.dollars_in_names);
        assert_eq!(desc.compiler.additional_arguments, vec!["-Wall", "-O2"]);
        assert_eq!(
            desc.exports,
            vec![PathBuf::from("include"), PathBuf::from("include/extra")]
        );
        // Declaration order, not alphabetical.
        let names: Vec<&String> = desc.dependencies.keys().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(desc.artifact_stem(), "acme-vec");
        assert_eq!(desc.output_dir(), PathBuf::from("/work/pkg/out"));
        assert_eq!(desc.entrypoint_path(), PathBuf::from("/work/pkg/src/vec.c"));
    }

    #[test]
    fn test_missing_entrypoint_is_config_error() {
        let mut log = CaptureLogger::new();
        let err = descriptor(r#"{ "name": "app" }"#, &mut log).unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
        assert!(err.to_string().contains("entrypoint"));
    }

    #[test]
    fn test_non_c_entrypoint_is_config_error() {
        let mut log = CaptureLogger::new();
        let err = descriptor(r#"{ "name": "app", "main": "main.py" }"#, &mut log).unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }

    #[test]
    fn test_library_without_exports_warns() {
        let mut log = CaptureLogger::new();
        descriptor(
            r#"{ "name": "lib", "main": "lib.c", "lattice": { "buildOptions": { "type": "lib" } } }"#,
            &mut log,
        )
        .unwrap();
        assert_eq!(log.warns.len(), 1);
        assert!(log.warns[0].contains("not exporting"));
    }

    #[test]
    fn test_absolute_import_warns_once() {
        let mut log = CaptureLogger::new();
        let abs = if cfg!(windows) { "C:\\\\inc" } else { "/usr/include" };
        let json = format!(
            r#"{{ "name": "app", "main": "main.c", "lattice": {{ "imports": ["rel", "{abs}", "{abs}"] }} }}"#
        );
        descriptor(&json, &mut log).unwrap();
        assert_eq!(log.warns.len(), 1);
        assert!(log.warns[0].contains("absolute"));
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let parsed = Manifest::parse(
            r#"{ "name": "app", "main": "main.c", "lattice": { "buildOptions": { "type": "dll" } } }"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_is_c_library() {
        let lib = Manifest::parse(
            r#"{ "name": "m", "main": "m.c", "lattice": { "buildOptions": { "type": "lib" } } }"#,
        )
        .unwrap();
        assert!(lib.is_c_library());

        let bin = Manifest::parse(r#"{ "name": "m", "main": "m.c", "lattice": {} }"#).unwrap();
        assert!(!bin.is_c_library());

        let js = Manifest::parse(r#"{ "name": "left-pad", "main": "index.js" }"#).unwrap();
        assert!(!js.is_c_library());
    }
}
