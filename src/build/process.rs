use crate::error::BuildError;
use std::path::Path;
use std::process::{Command, Stdio};

/// How the child's output streams are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect stdout and stderr; they are returned (or attached to the error).
    Captured,
    /// Forward the child's streams live. Nothing is captured.
    Inherit,
}

/// Run `compiler` with `args` from the compiler's own directory and wait for it.
///
/// Returns the combined output in [`OutputMode::Captured`] (empty otherwise).
/// A non-zero exit becomes [`BuildError::CompilationFailure`] for `package`;
/// a spawn failure becomes [`BuildError::CompilerLaunch`].
pub fn run_compiler(
    compiler: &Path,
    args: &[String],
    package: &str,
    mode: OutputMode,
) -> Result<String, BuildError> {
    let mut cmd = Command::new(compiler);
    cmd.args(args);
    if let Some(dir) = compiler.parent().filter(|d| !d.as_os_str().is_empty()) {
        cmd.current_dir(dir);
    }

    let launch_err = |source| BuildError::CompilerLaunch {
        path: compiler.to_path_buf(),
        source,
    };

    match mode {
        OutputMode::Captured => {
            let out = cmd
                .stdin(Stdio::null())
                .output()
                .map_err(launch_err)?;
            let mut combined = String::from_utf8_lossy(&out.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&out.stderr));

            if out.status.success() {
                Ok(combined)
            } else {
                Err(BuildError::CompilationFailure {
                    package: package.to_string(),
                    code: out.status.code(),
                    output: combined,
                })
            }
        }
        OutputMode::Inherit => {
            let status = cmd.status().map_err(launch_err)?;
            if status.success() {
                Ok(String::new())
            } else {
                Err(BuildError::CompilationFailure {
                    package: package.to_string(),
                    code: status.code(),
                    output: String::new(),
                })
            }
        }
    }
}
