//! # lattice CLI Entry Point
//!
//! Parses CLI arguments using clap and routes commands to their handlers.
//!
//! ## Commands
//!
//! - **Build**: `build`, `run`, `clean`
//! - **Project**: `init`, `tree`
//! - **Shell**: `completion`

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use lattice::build;
use lattice::commands;
use lattice::config::PackageDescriptor;
use lattice::log::{ConsoleLogger, Logger};
use lattice::tree;

#[derive(Parser)]
#[command(name = "lattice")]
#[command(about = "Build and run C packages, dependencies first", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the package and its dependencies to disk
    Build {
        /// Wipe the .lattice work directory first
        #[arg(long)]
        clean: bool,
        /// Package root [default: current directory]
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Build the dependencies, then compile and run the package in memory
    Run {
        /// Wipe the .lattice work directory first
        #[arg(long)]
        clean: bool,
        /// Package root [default: current directory]
        #[arg(long)]
        path: Option<PathBuf>,
        /// Arguments passed to the program
        #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Create a new package
    Init {
        /// Package name (interactive if omitted)
        name: Option<String>,
    },
    /// Show the package's direct dependencies
    Tree {
        /// Package root [default: current directory]
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Remove the work directory and build outputs
    Clean {
        /// Package root [default: current directory]
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn package_root(path: &Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("Failed to read current directory"),
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Build { clean, path } => {
            commands::build::handle_build(&package_root(&path)?, clean)
        }
        Commands::Run { clean, path, args } => {
            commands::build::handle_run(&package_root(&path)?, clean, &args)
        }
        Commands::Init { name } => {
            let cwd = std::env::current_dir()?;
            commands::init::create_project(&cwd, name)?;
            Ok(true)
        }
        Commands::Tree { path } => {
            let mut log = ConsoleLogger::new();
            let package = PackageDescriptor::load(&package_root(&path)?, &mut log);
            log.finish();
            tree::print_tree(&package?)?;
            Ok(true)
        }
        Commands::Clean { path } => {
            let mut log = ConsoleLogger::quiet();
            let package = PackageDescriptor::load(&package_root(&path)?, &mut log)?;
            build::clean(&package)?;
            Ok(true)
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(true)
        }
    }
}
