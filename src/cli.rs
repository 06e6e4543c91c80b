//! CLI argument parsing module for envpin

use clap::Parser;
use std::path::PathBuf;

/// Install a tool into a project-local virtual environment and pin it
#[derive(Parser, Debug, Clone)]
#[command(
    name = "envpin",
    version,
    about = "Install a tool into a project-local virtual environment and pin it"
)]
pub struct CliArgs {
    /// Package specifier, e.g. `combine` or `combine==2.2.1`
    pub package: String,

    /// Update an existing installation to the given (or latest) version
    #[arg(long, conflicts_with = "reinstall")]
    pub update: bool,

    /// Destroy and recreate the environment and manifest
    #[arg(long)]
    pub reinstall: bool,

    /// Executable name to look for on PATH, when it differs from the
    /// package name
    #[arg(long, value_name = "NAME")]
    pub entrypoint: Option<String>,

    /// Project directory to operate in
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub path: PathBuf,

    /// Stream installer output instead of suppressing it
    #[arg(long)]
    pub debug: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Print a machine-readable install report to stdout
    #[arg(long)]
    pub json: bool,
}
