//! Child-process integration for environment tooling
//!
//! This module provides:
//! - The EnvRunner trait seam so install flows can be tested without
//!   spawning processes
//! - SystemRunner, which invokes the base interpreter and the
//!   environment's own installer as blocking child processes
//! - Parsing of the installer's frozen-requirements listing
//!
//! Every invocation is an opaque blocking call: spawn, wait, check exit
//! status. There is no cancellation or timeout handling.

use crate::error::{EnvironmentError, InstallerError};
use crate::spec::normalize_name;
use crate::venv::{self, EnvLayout};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Trait for running environment and installer commands
pub trait EnvRunner {
    /// Create the isolated environment with the base interpreter
    fn create_env(&self, layout: &EnvLayout) -> Result<(), EnvironmentError>;

    /// Remove the environment directory wholesale
    fn remove_env(&self, layout: &EnvLayout) -> Result<(), EnvironmentError>;

    /// Install a package specifier into the environment
    fn install(&self, layout: &EnvLayout, spec: &str) -> Result<(), InstallerError>;

    /// Install a package specifier, upgrading if already present
    fn upgrade(&self, layout: &EnvLayout, spec: &str) -> Result<(), InstallerError>;

    /// Install everything the manifest file lists
    fn install_manifest(&self, layout: &EnvLayout, manifest: &Path) -> Result<(), InstallerError>;

    /// The installer's frozen `name==version` listing
    fn freeze(&self, layout: &EnvLayout) -> Result<String, InstallerError>;

    /// Resolve an executable name the way the user's shell would
    fn resolve_entrypoint(&self, name: &str) -> Option<PathBuf>;
}

/// Default runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemRunner {
    /// Stream installer output instead of suppressing it
    debug: bool,
}

impl SystemRunner {
    /// Create a new system runner
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn run_pip(&self, layout: &EnvLayout, args: &[&str]) -> Result<(), InstallerError> {
        let pip = layout.pip_path();
        let command = display_command(&pip, args);

        let output = Command::new(&pip)
            .args(args)
            .current_dir(layout.project_root())
            .output()
            .map_err(|e| InstallerError::spawn_failed(&command, e))?;

        if self.debug && !output.stdout.is_empty() {
            print!("{}", String::from_utf8_lossy(&output.stdout));
        }

        check_status(&command, &output).map_err(|(status, stderr)| InstallerError::Failed {
            command,
            status,
            stderr,
        })
    }
}

impl EnvRunner for SystemRunner {
    fn create_env(&self, layout: &EnvLayout) -> Result<(), EnvironmentError> {
        let interpreter =
            venv::find_base_interpreter().ok_or(EnvironmentError::InterpreterNotFound)?;
        let args = ["-m", "venv", venv::ENV_DIR];
        let command = display_command(&interpreter, &args);

        let output = Command::new(&interpreter)
            .args(args)
            .current_dir(layout.project_root())
            .output()
            .map_err(|e| EnvironmentError::spawn_failed(&command, e))?;

        check_status(&command, &output).map_err(|(status, stderr)| {
            EnvironmentError::CreateFailed {
                command,
                status,
                stderr,
            }
        })
    }

    fn remove_env(&self, layout: &EnvLayout) -> Result<(), EnvironmentError> {
        fs::remove_dir_all(layout.env_dir())
            .map_err(|e| EnvironmentError::remove_failed(layout.env_dir(), e))
    }

    fn install(&self, layout: &EnvLayout, spec: &str) -> Result<(), InstallerError> {
        self.run_pip(layout, &["install", spec])
    }

    fn upgrade(&self, layout: &EnvLayout, spec: &str) -> Result<(), InstallerError> {
        self.run_pip(layout, &["install", "-U", spec])
    }

    fn install_manifest(&self, layout: &EnvLayout, manifest: &Path) -> Result<(), InstallerError> {
        let manifest = manifest.to_string_lossy();
        self.run_pip(layout, &["install", "-r", manifest.as_ref()])
    }

    fn freeze(&self, layout: &EnvLayout) -> Result<String, InstallerError> {
        let pip = layout.pip_path();
        let command = display_command(&pip, &["freeze"]);

        let output = Command::new(&pip)
            .arg("freeze")
            .current_dir(layout.project_root())
            .output()
            .map_err(|e| InstallerError::spawn_failed(&command, e))?;

        check_status(&command, &output).map_err(|(status, stderr)| InstallerError::Failed {
            command,
            status,
            stderr,
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn resolve_entrypoint(&self, name: &str) -> Option<PathBuf> {
        venv::find_in_path(name)
    }
}

/// Extract a package's pin from frozen-requirements output, using
/// normalized name comparison. Returns the name exactly as the
/// installer reports it, plus the installed version.
pub fn parse_frozen_pin(freeze_output: &str, name: &str) -> Option<(String, String)> {
    let wanted = normalize_name(name);
    for line in freeze_output.lines() {
        if let Some((frozen_name, version)) = line.split_once("==") {
            if normalize_name(frozen_name.trim()) == wanted {
                return Some((frozen_name.trim().to_string(), version.trim().to_string()));
            }
        }
    }
    None
}

fn display_command(program: &Path, args: &[&str]) -> String {
    let mut parts = vec![program.to_string_lossy().into_owned()];
    parts.extend(args.iter().map(|a| a.to_string()));
    parts.join(" ")
}

fn check_status(_command: &str, output: &Output) -> Result<(), (String, String)> {
    if output.status.success() {
        Ok(())
    } else {
        Err((
            output.status.to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frozen_pin_exact() {
        let freeze = "alpha==1.0.0\ncombine==2.2.1\nzeta==9.9.9\n";
        assert_eq!(
            parse_frozen_pin(freeze, "combine"),
            Some(("combine".to_string(), "2.2.1".to_string()))
        );
    }

    #[test]
    fn test_parse_frozen_pin_normalized_keeps_reported_name() {
        let freeze = "My_Tool==1.4.2\n";
        assert_eq!(
            parse_frozen_pin(freeze, "my-tool"),
            Some(("My_Tool".to_string(), "1.4.2".to_string()))
        );
        assert_eq!(
            parse_frozen_pin(freeze, "MY.TOOL"),
            Some(("My_Tool".to_string(), "1.4.2".to_string()))
        );
    }

    #[test]
    fn test_parse_frozen_pin_absent() {
        let freeze = "alpha==1.0.0\n";
        assert_eq!(parse_frozen_pin(freeze, "combine"), None);
    }

    #[test]
    fn test_parse_frozen_pin_skips_non_pin_lines() {
        let freeze = "-e git+https://example.com/combine.git#egg=combine\nalpha==1.0.0\n";
        assert_eq!(parse_frozen_pin(freeze, "combine"), None);
        assert_eq!(
            parse_frozen_pin(freeze, "alpha"),
            Some(("alpha".to_string(), "1.0.0".to_string()))
        );
    }

    #[test]
    fn test_parse_frozen_pin_no_prefix_match() {
        // `combine-extras` must not satisfy a lookup for `combine`
        let freeze = "combine-extras==0.3.0\n";
        assert_eq!(parse_frozen_pin(freeze, "combine"), None);
    }

    #[test]
    fn test_display_command() {
        let cmd = display_command(Path::new(".venv/bin/pip"), &["install", "combine"]);
        assert_eq!(cmd, ".venv/bin/pip install combine");
    }

    #[test]
    fn test_system_runner_new() {
        let runner = SystemRunner::new(false);
        assert!(!runner.debug);
    }

    #[test]
    fn test_remove_env_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = EnvLayout::new(dir.path());
        let runner = SystemRunner::new(false);
        assert!(runner.remove_env(&layout).is_err());
    }
}
