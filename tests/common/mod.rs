#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use lattice::build::{BuildState, InitOptions};
use lattice::config::MANIFEST_FILE;
use lattice::deps::dependency_path;
use lattice::error::BuildError;
use lattice::log::CaptureLogger;
use lattice::toolchain::Platform;

/// A stand-in for tcc that appends its argument list to a log file, one
/// invocation per line. Invocations mentioning `broken.c` exit with status 1.
pub struct FakeCompiler {
    _dir: tempfile::TempDir,
    pub path: PathBuf,
    pub log: PathBuf,
}

impl FakeCompiler {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcc");
        let log = dir.path().join("invocations.log");
        let script = format!(
            "#!/bin/sh\n\
             echo \"$@\" >> \"{}\"\n\
             case \"$*\" in\n\
             *broken.c*) echo \"broken.c:1: error: undefined symbol 'missing'\" >&2; exit 1;;\n\
             esac\n\
             exit 0\n",
            log.display()
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Self {
            _dir: dir,
            path,
            log,
        }
    }

    /// Every recorded invocation, split into arguments.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        match fs::read_to_string(&self.log) {
            Ok(content) => content
                .lines()
                .map(|l| l.split_whitespace().map(String::from).collect())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Write `manifest` as the package.json of `dir`.
pub fn write_manifest(dir: &Path, manifest: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
}

/// A binary package named `name` depending on `deps`.
pub fn app(dir: &Path, name: &str, deps: &[&str], lattice: &str) {
    write_manifest(
        dir,
        &format!(
            r#"{{ "name": "{}", "version": "1.0.0", "main": "src/main.c", "dependencies": {{ {} }}, "lattice": {} }}"#,
            name,
            dependency_list(deps),
            lattice
        ),
    );
}

/// A C library named `name`, installed under `parent`'s node_modules, exporting `include`.
pub fn library(parent: &Path, name: &str, deps: &[&str]) -> PathBuf {
    library_with_entry(parent, name, deps, &format!("src/{}.c", name))
}

pub fn library_with_entry(parent: &Path, name: &str, deps: &[&str], main: &str) -> PathBuf {
    let dir = dependency_path(parent, name);
    write_manifest(
        &dir,
        &format!(
            r#"{{ "name": "{}", "version": "1.0.0", "main": "{}", "dependencies": {{ {} }}, "lattice": {{ "exports": ["include"], "buildOptions": {{ "type": "lib" }} }} }}"#,
            name,
            main,
            dependency_list(deps)
        ),
    );
    fs::create_dir_all(dir.join("include")).unwrap();
    dir
}

fn dependency_list(deps: &[&str]) -> String {
    deps.iter()
        .map(|d| format!("\"{}\": \"^1.0.0\"", d))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn init(root: &Path, compiler: &FakeCompiler, jit: bool) -> Result<BuildState, BuildError> {
    let options = InitOptions {
        clean: false,
        jit,
        compiler: Some(compiler.path.clone()),
        platform: Some(Platform::Linux),
    };
    BuildState::init(root, options, &mut CaptureLogger::new())
}

pub fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).map(String::as_str)
}
