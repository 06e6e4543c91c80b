//! Embedded self-update entrypoint
//!
//! Called from inside an installed tool's own command dispatch (its
//! `update` subcommand). Locates the managed environment from the running
//! executable's path and re-runs the update flow for the tool's own
//! package name. Returns the result to the caller instead of exiting,
//! since the host tool owns the process.

use crate::error::{AppError, FlowError};
use crate::flows::InstallFlow;
use crate::output::Reporter;
use crate::report::InstallReport;
use crate::runner::SystemRunner;
use crate::spec::PackageSpec;
use crate::venv::{EnvLayout, ENV_DIR};
use std::env;
use std::path::{Path, PathBuf};

/// Update the named package in the environment this executable runs from
pub fn update(package_name: &str) -> Result<InstallReport, AppError> {
    update_with_entrypoint(package_name, None)
}

/// Update with an explicit entrypoint name, when it differs from the
/// package name
pub fn update_with_entrypoint(
    package_name: &str,
    entrypoint: Option<&str>,
) -> Result<InstallReport, AppError> {
    let exe = env::current_exe().unwrap_or_default();
    let root = locate_project_root(&exe)
        .ok_or_else(|| FlowError::ProjectRootNotFound { exe: exe.clone() })?;

    let spec = PackageSpec::parse(package_name)?;
    let runner = SystemRunner::new(false);
    let flow = InstallFlow::new(
        EnvLayout::new(root),
        &runner,
        Reporter::new(false, false),
        spec,
        entrypoint.map(String::from),
    );
    flow.run(true, false)
}

/// The project root an executable belongs to: the parent of the
/// environment directory the executable lives in
fn locate_project_root(exe: &Path) -> Option<PathBuf> {
    exe.ancestors()
        .find(|a| a.file_name().map_or(false, |n| n == ENV_DIR))
        .and_then(|env_dir| env_dir.parent())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_project_root_from_env_executable() {
        let exe = Path::new("/work/project/.venv/bin/combine");
        assert_eq!(
            locate_project_root(exe),
            Some(PathBuf::from("/work/project"))
        );
    }

    #[test]
    fn test_locate_project_root_outside_env() {
        assert_eq!(locate_project_root(Path::new("/usr/bin/combine")), None);
        assert_eq!(locate_project_root(Path::new("")), None);
    }

    #[test]
    fn test_locate_project_root_nested_env_dir_name() {
        // The nearest .venv ancestor wins
        let exe = Path::new("/work/.venv/project/.venv/bin/combine");
        assert_eq!(locate_project_root(exe), Some(PathBuf::from("/work/.venv/project")));
    }
}
