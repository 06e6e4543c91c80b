//! Install flows and mode selection
//!
//! This module provides:
//! - The 4-mode state machine (create / install / update / reinstall)
//!   derived from filesystem state and CLI flags
//! - Preflight refusal of projects managed by other dependency workflows
//! - The flows themselves, which only touch the manifest after the
//!   installer step has succeeded
//! - Post-install PATH and gitignore checks

use crate::error::{AppError, FlowError, InstallerError, ManifestError};
use crate::manifest::{self, Manifest};
use crate::output::Reporter;
use crate::report::{InstallReport, Mode};
use crate::runner::{parse_frozen_pin, EnvRunner};
use crate::spec::PackageSpec;
use crate::venv::{EnvLayout, ENV_DIR};
use std::fs;
use std::path::Path;

/// Marker files of dependency workflows this tool refuses to touch,
/// with the command to use instead
const FOREIGN_MARKERS: &[(&str, &str, &str)] = &[
    ("pyproject.toml", "Poetry", "poetry update"),
    ("poetry.lock", "Poetry", "poetry update"),
    ("Pipfile", "Pipenv", "pipenv update"),
    ("Pipfile.lock", "Pipenv", "pipenv update"),
    ("requirements.in", "pip-compile", "pip-compile requirements.in"),
    ("setup.py", "setuptools", "python setup.py install"),
];

/// Select the flow to run from filesystem state and flags.
///
/// Flags only disambiguate the case where both artifacts already exist;
/// everywhere else the filesystem decides.
pub fn select_mode(
    venv_exists: bool,
    manifest_exists: bool,
    update: bool,
    reinstall: bool,
) -> Result<Mode, FlowError> {
    match (venv_exists, manifest_exists) {
        (false, false) => Ok(Mode::Create),
        (false, true) => Ok(if update { Mode::Update } else { Mode::Install }),
        (true, false) => Err(FlowError::EnvWithoutManifest {
            env_dir: ENV_DIR.to_string(),
            manifest: manifest::FILE_NAME.to_string(),
        }),
        (true, true) => {
            if update {
                Ok(Mode::Update)
            } else if reinstall {
                Ok(Mode::Reinstall)
            } else {
                Err(FlowError::ExistingInstallation)
            }
        }
    }
}

/// A single install/update run against one project directory
pub struct InstallFlow<'a, R: EnvRunner> {
    layout: EnvLayout,
    runner: &'a R,
    reporter: Reporter,
    spec: PackageSpec,
    entrypoint: String,
}

impl<'a, R: EnvRunner> InstallFlow<'a, R> {
    /// Create a flow for a package spec in the layout's project directory
    pub fn new(
        layout: EnvLayout,
        runner: &'a R,
        reporter: Reporter,
        spec: PackageSpec,
        entrypoint: Option<String>,
    ) -> Self {
        let entrypoint = entrypoint.unwrap_or_else(|| spec.name().to_string());
        Self {
            layout,
            runner,
            reporter,
            spec,
            entrypoint,
        }
    }

    /// Run the flow selected by the filesystem and the given flags
    pub fn run(&self, update: bool, reinstall: bool) -> Result<InstallReport, AppError> {
        self.preflight()?;

        let manifest_exists = self.layout.manifest_path().exists();
        if update && !manifest_exists {
            return Err(ManifestError::not_found(self.layout.manifest_path()).into());
        }

        let mode = select_mode(self.layout.exists(), manifest_exists, update, reinstall)?;
        match mode {
            Mode::Create => self.create(Mode::Create),
            Mode::Install => self.install(),
            Mode::Update => self.update(),
            Mode::Reinstall => self.reinstall(),
        }
    }

    /// Refuse projects managed by a different dependency workflow
    fn preflight(&self) -> Result<(), FlowError> {
        for (marker, tool, command) in FOREIGN_MARKERS {
            if self.layout.project_root().join(marker).exists() {
                return Err(FlowError::foreign_workflow(*tool, *command));
            }
        }
        Ok(())
    }

    /// Fresh environment and fresh manifest
    fn create(&self, mode: Mode) -> Result<InstallReport, AppError> {
        self.reporter
            .event(&format!("Setting up {} in this directory", self.spec.raw()));

        self.ensure_env()?;
        self.install_spec(false)?;

        let (name, version) = self.resolved_pin()?;
        let manifest = Manifest::bootstrap(&self.layout.manifest_path(), &name, &version);
        self.reporter
            .event(&format!("- Saving {}", manifest::FILE_NAME));
        manifest.save()?;

        self.check_path(true)?;
        self.check_gitignore();

        Ok(InstallReport::new(
            name,
            version,
            None,
            mode,
            manifest.path(),
        ))
    }

    /// Environment missing, manifest present: recreate the environment
    /// from the pins. The manifest is not rewritten.
    fn install(&self) -> Result<InstallReport, AppError> {
        self.reporter.event(&format!(
            "Installing {} into this directory",
            self.spec.raw()
        ));

        let manifest = Manifest::load(&self.layout.manifest_path())?;
        self.ensure_env()?;

        self.reporter
            .event(&format!("- Installing {}", manifest::FILE_NAME));
        let progress = self
            .reporter
            .progress(&format!("Installing {}", manifest::FILE_NAME));
        let result = self
            .runner
            .install_manifest(&self.layout, &self.layout.manifest_path());
        progress.finish();
        result?;

        let (name, version) = self.resolved_pin()?;
        self.check_path(true)?;
        self.check_gitignore();

        Ok(InstallReport::new(
            name,
            version,
            None,
            Mode::Install,
            manifest.path(),
        ))
    }

    /// Move an existing installation to a new (or re-resolved) version
    fn update(&self) -> Result<InstallReport, AppError> {
        self.reporter.event(&format!("Updating {}", self.spec.raw()));

        let mut manifest = Manifest::load(&self.layout.manifest_path())?;
        let previous = manifest.pinned_version(self.spec.name()).map(String::from);

        self.ensure_env()?;
        // A bare name moves to latest; a constrained spec installs that
        // constraint instead
        self.install_spec(self.spec.is_bare())?;

        let (name, version) = self.resolved_pin()?;
        manifest.set_pin(&name, &version);
        self.reporter
            .event(&format!("- Saving {}", manifest::FILE_NAME));
        manifest.save()?;

        self.check_path(false)?;

        Ok(InstallReport::new(
            name,
            version,
            previous,
            Mode::Update,
            manifest.path(),
        ))
    }

    /// Destroy the environment and manifest, then create from scratch
    fn reinstall(&self) -> Result<InstallReport, AppError> {
        self.reporter.event(&format!(
            "Re-installing {} into this directory",
            self.spec.raw()
        ));
        self.remove_existing()?;
        self.create(Mode::Reinstall)
    }

    fn ensure_env(&self) -> Result<(), AppError> {
        if !self.layout.exists() {
            self.reporter
                .event(&format!("- Creating a virtual environment at {}", ENV_DIR));
            self.runner.create_env(&self.layout)?;
        }
        Ok(())
    }

    fn remove_existing(&self) -> Result<(), AppError> {
        if self.layout.exists() {
            self.reporter
                .event(&format!("  - Removing existing {}", ENV_DIR));
            self.runner.remove_env(&self.layout)?;
        }

        let manifest_path = self.layout.manifest_path();
        if manifest_path.exists() {
            self.reporter
                .event(&format!("  - Removing existing {}", manifest::FILE_NAME));
            fs::remove_file(&manifest_path)
                .map_err(|e| ManifestError::write(&manifest_path, e))?;
        }
        Ok(())
    }

    fn install_spec(&self, upgrade: bool) -> Result<(), InstallerError> {
        self.reporter.event(&format!(
            "- Installing {} with {}/pip",
            self.spec.raw(),
            self.layout.bin_dir_display()
        ));
        let progress = self
            .reporter
            .progress(&format!("Installing {}", self.spec.raw()));
        let result = if upgrade {
            self.runner.upgrade(&self.layout, self.spec.raw())
        } else {
            self.runner.install(&self.layout, self.spec.raw())
        };
        progress.finish();
        result
    }

    /// The package's pin as the installer reports it after a
    /// successful install
    fn resolved_pin(&self) -> Result<(String, String), AppError> {
        let freeze = self.runner.freeze(&self.layout)?;
        parse_frozen_pin(&freeze, self.spec.name())
            .ok_or_else(|| InstallerError::not_installed(self.spec.name()).into())
    }

    /// Verify the entrypoint resolves into the environment's executable
    /// directory. Fatal after a fresh install (the user cannot invoke
    /// the tool at all); a warning on update.
    fn check_path(&self, fatal: bool) -> Result<(), FlowError> {
        let available = self
            .runner
            .resolve_entrypoint(&self.entrypoint)
            .map(|path| self.layout.contains(&path))
            .unwrap_or(false);
        if available {
            return Ok(());
        }

        let err = FlowError::EntrypointNotOnPath {
            name: self.entrypoint.clone(),
            bin_dir: self.layout.bin_dir_display(),
        };
        if fatal {
            Err(err)
        } else {
            self.reporter.warn(&err.to_string());
            Ok(())
        }
    }

    fn check_gitignore(&self) {
        let root = self.layout.project_root();
        if !root.join(".git").exists() {
            return;
        }
        if gitignore_lists(root, ENV_DIR) {
            return;
        }
        self.reporter.warn(&format!(
            "- You should add {} to your .gitignore so that it is not tracked by git",
            ENV_DIR
        ));
    }
}

/// Whether .gitignore already lists an entry (with or without a leading
/// slash, case-insensitive)
fn gitignore_lists(root: &Path, entry: &str) -> bool {
    let Ok(content) = fs::read_to_string(root.join(".gitignore")) else {
        return false;
    };
    let entry = entry.to_lowercase();
    content.lines().any(|line| {
        let trimmed = line.trim().to_lowercase();
        trimmed == entry || trimmed == format!("/{}", entry)
    })
}
