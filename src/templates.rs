//! Package templates for `lattice init`.
//!
//! - binary: `src/main.c` printing a greeting
//! - library: `src/main.c` plus a public header under `include/`, exported

use crate::config::{ArtifactKind, BoundaryChecks, Subsystem};
use serde_json::{Value, json};

pub const SAMPLE_ENTRYPOINT: &str = r#"#include <stdio.h>

int main(void)
{
    printf("Hello world from Lattice!\n");
    return 0;
}
"#;

/// Answers collected by `lattice init`.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub name: String,
    pub kind: ArtifactKind,
    pub boundary_checks: BoundaryChecks,
    pub winpe: Subsystem,
}

/// `package.json` contents for a new package.
pub fn manifest(opts: &ProjectOptions) -> Value {
    let mut lattice = json!({
        "outdir": "./dist",
        "buildOptions": {
            "type": opts.kind,
            "boundaryChecks": opts.boundary_checks,
            "winpe": opts.winpe,
        },
    });
    if opts.kind == ArtifactKind::Library {
        lattice["exports"] = json!(["./include"]);
    }

    json!({
        "name": opts.name,
        "version": "1.0.0",
        "description": "Sample project for a lattice application.",
        "private": true,
        "main": "./src/main.c",
        "scripts": {
            "run": "lattice run",
            "build": "lattice build",
        },
        "lattice": lattice,
        "devDependencies": {
            "@lattice/lattice": format!("^{}", env!("CARGO_PKG_VERSION")),
        },
    })
}

/// Header file name for a library package.
pub fn header_name(name: &str) -> String {
    format!("{}.h", name.trim_start_matches('@').replace('/', "-"))
}

/// Public header for a library package.
pub fn library_header(name: &str) -> String {
    let guard: String = header_name(name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "#ifndef {guard}\n#define {guard}\n\nint {}_answer(void);\n\n#endif\n",
        symbol_prefix(name)
    )
}

/// Entrypoint for a library package.
pub fn library_source(name: &str) -> String {
    format!(
        "#include \"{}\"\n\nint {}_answer(void)\n{{\n    return 42;\n}}\n",
        header_name(name),
        symbol_prefix(name)
    )
}

fn symbol_prefix(name: &str) -> String {
    name.trim_start_matches('@')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Manifest;

    fn opts(kind: ArtifactKind) -> ProjectOptions {
        ProjectOptions {
            name: "my-lattice-app".to_string(),
            kind,
            boundary_checks: BoundaryChecks::AppAndDeps,
            winpe: Subsystem::Console,
        }
    }

    #[test]
    fn test_binary_manifest_round_trips_through_loader() {
        let json = manifest(&opts(ArtifactKind::Binary)).to_string();
        let parsed = Manifest::parse(&json).unwrap();
        let lattice = parsed.lattice.unwrap();
        assert_eq!(parsed.main.as_deref(), Some("./src/main.c"));
        assert_eq!(lattice.build_options.kind, ArtifactKind::Binary);
        assert_eq!(lattice.build_options.boundary_checks, BoundaryChecks::AppAndDeps);
        assert!(lattice.exports.is_empty());
    }

    #[test]
    fn test_library_manifest_exports_include() {
        let value = manifest(&opts(ArtifactKind::Library));
        assert_eq!(value["lattice"]["buildOptions"]["type"], "lib");
        assert_eq!(value["lattice"]["exports"][0], "./include");
        let parsed = Manifest::parse(&value.to_string()).unwrap();
        assert!(parsed.is_c_library());
    }

    #[test]
    fn test_library_header() {
        let header = library_header("@acme/vec-math");
        assert!(header.starts_with("#ifndef ACME_VEC_MATH_H"));
        assert!(header.contains("int acme_vec_math_answer(void);"));
        assert_eq!(header_name("@acme/vec-math"), "acme-vec-math.h");
        assert!(library_source("@acme/vec-math").contains("#include \"acme-vec-math.h\""));
    }
}
