//! `lattice init`: interactive package scaffolding.

use crate::config::{ArtifactKind, BoundaryChecks, MANIFEST_FILE, Subsystem};
use crate::templates::{self, ProjectOptions};
use anyhow::{Context, Result};
use colored::*;
use inquire::{Confirm, Select, Text};
use std::fs;
use std::path::{Path, PathBuf};

const APP_LABEL: &str = "Application";
const LIB_LABEL: &str = "Library";
const CHECKS_APP: &str = "Yes, for my application.";
const CHECKS_APP_DEPS: &str = "Yes, for my application and its dependencies.";
const CHECKS_NONE: &str = "No.";
const WINPE_GUI: &str = "Windowed";

pub fn create_project(cwd: &Path, name: Option<String>) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Text::new("What is your application's name?")
            .with_default("my-lattice-app")
            .prompt()?,
    };

    let project_path = cwd.join(&name);
    if project_path.exists() {
        let overwrite = Confirm::new(&format!(
            "\"{}\" already exists in the current directory. Delete it?",
            name
        ))
        .with_default(false)
        .prompt()?;
        if !overwrite {
            println!("{} Nothing was created.", "!".yellow());
            return Ok(());
        }
        fs::remove_dir_all(&project_path)
            .with_context(|| format!("Failed to remove {}", project_path.display()))?;
    }

    let kind = match Select::new(
        "What kind of application are you creating?",
        vec![APP_LABEL, LIB_LABEL],
    )
    .prompt()?
    {
        LIB_LABEL => ArtifactKind::Library,
        _ => ArtifactKind::Binary,
    };

    let boundary_checks = match Select::new(
        "Do you want to use boundary checks for increased memory safety?",
        vec![CHECKS_APP, CHECKS_APP_DEPS, CHECKS_NONE],
    )
    .with_help_message("Boundary checking is NOT a replacement for safe programming practices.")
    .prompt()?
    {
        CHECKS_APP => BoundaryChecks::App,
        CHECKS_APP_DEPS => BoundaryChecks::AppAndDeps,
        _ => BoundaryChecks::None,
    };

    let mut winpe = Subsystem::Console;
    if cfg!(windows) && kind == ArtifactKind::Binary {
        let answer = Select::new(
            "Is your application a console or a windowed app?",
            vec!["Console", WINPE_GUI],
        )
        .prompt()?;
        if answer == WINPE_GUI {
            winpe = Subsystem::Gui;
        }
    }

    let opts = ProjectOptions {
        name: name.clone(),
        kind,
        boundary_checks,
        winpe,
    };
    scaffold(cwd, &opts)?;

    println!(
        "{} Application successfully set up in \"{}\". To get started,",
        "✓".green(),
        name.bold()
    );
    println!("  cd {}\n  lattice run", name);
    Ok(())
}

/// Write a new package into `<cwd>/<name>`. Fails if the directory exists.
pub fn scaffold(cwd: &Path, opts: &ProjectOptions) -> Result<PathBuf> {
    let path = cwd.join(&opts.name);
    if path.exists() {
        anyhow::bail!("Directory '{}' already exists", path.display());
    }

    let src = path.join("src");
    fs::create_dir_all(&src).context("Failed to create src")?;

    match opts.kind {
        ArtifactKind::Binary => {
            fs::write(src.join("main.c"), templates::SAMPLE_ENTRYPOINT)?;
        }
        ArtifactKind::Library => {
            let include = path.join("include");
            fs::create_dir_all(&include).context("Failed to create include")?;
            fs::write(
                include.join(templates::header_name(&opts.name)),
                templates::library_header(&opts.name),
            )?;
            fs::write(src.join("main.c"), templates::library_source(&opts.name))?;
        }
    }

    let manifest = serde_json::to_string_pretty(&templates::manifest(opts))?;
    fs::write(path.join(MANIFEST_FILE), manifest)?;
    fs::write(path.join(".gitignore"), ".lattice/\ndist/\nnode_modules/\n")?;

    Ok(path)
}
