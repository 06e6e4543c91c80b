//! Application error types using thiserror
//!
//! Error hierarchy:
//! - EnvironmentError: Virtual environment creation/removal failures
//! - InstallerError: Failures of the environment's package installer
//! - ManifestError: Manifest file read/write failures
//! - FlowError: Preflight refusals and post-install check failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Virtual environment related errors
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    /// Package installer related errors
    #[error(transparent)]
    Installer(#[from] InstallerError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Workflow preflight and check errors
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Errors related to the isolated environment directory
#[derive(Error, Debug)]
pub enum EnvironmentError {
    /// No base interpreter available to create the environment with
    #[error("no base interpreter found on PATH (tried python3, python)")]
    InterpreterNotFound,

    /// The environment creation process could not be spawned
    #[error("failed to run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The environment creation process exited non-zero
    #[error("environment creation failed (`{command}` exited with {status}): {stderr}")]
    CreateFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Failed to remove an existing environment
    #[error("failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the environment's package installer
#[derive(Error, Debug)]
pub enum InstallerError {
    /// The installer executable could not be spawned
    #[error("failed to run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The installer exited non-zero; stderr is passed through verbatim
    /// so resolver messages ("package not found") reach the user
    #[error("installer failed (`{command}` exited with {status}):\n{stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The installer reported success but the package is not present
    /// in its installed-package listing
    #[error("could not find a pinned version of {package} after install")]
    NotInstalled { package: String },
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found where one is required
    #[error("no {path} found; this does not look like a managed installation (or you are in the wrong directory)")]
    NotFound { path: PathBuf },

    /// Failed to read the manifest file
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the manifest file
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by workflow preflight and post-install checks
#[derive(Error, Debug)]
pub enum FlowError {
    /// The project is managed by a different dependency workflow
    #[error("this project appears to use {tool}; use `{command}` instead")]
    ForeignWorkflow { tool: String, command: String },

    /// Both the environment and the manifest already exist
    #[error("an existing installation was found; use --update or --reinstall")]
    ExistingInstallation,

    /// An environment exists with no manifest next to it
    #[error("{env_dir} exists but {manifest} does not; this may not be a managed installation")]
    EnvWithoutManifest { env_dir: String, manifest: String },

    /// The installed entrypoint does not resolve into the environment
    #[error(
        "could not find {name} on PATH\n\nAdd this to your .bash_profile/.zshrc:\nexport PATH=\"./{bin_dir}:$PATH\""
    )]
    EntrypointNotOnPath { name: String, bin_dir: String },

    /// The running executable is not inside a managed environment
    #[error("could not locate a managed environment from {exe}")]
    ProjectRootNotFound { exe: PathBuf },

    /// Empty or malformed package specifier
    #[error("invalid package specifier '{spec}': {message}")]
    InvalidSpec { spec: String, message: String },
}

impl EnvironmentError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        EnvironmentError::SpawnFailed {
            command: command.into(),
            source,
        }
    }

    /// Creates a new RemoveFailed error
    pub fn remove_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EnvironmentError::RemoveFailed {
            path: path.into(),
            source,
        }
    }
}

impl InstallerError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        InstallerError::SpawnFailed {
            command: command.into(),
            source,
        }
    }

    /// Creates a new NotInstalled error
    pub fn not_installed(package: impl Into<String>) -> Self {
        InstallerError::NotInstalled {
            package: package.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new Read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Write {
            path: path.into(),
            source,
        }
    }
}

impl FlowError {
    /// Creates a new ForeignWorkflow error
    pub fn foreign_workflow(tool: impl Into<String>, command: impl Into<String>) -> Self {
        FlowError::ForeignWorkflow {
            tool: tool.into(),
            command: command.into(),
        }
    }

    /// Creates a new InvalidSpec error
    pub fn invalid_spec(spec: impl Into<String>, message: impl Into<String>) -> Self {
        FlowError::InvalidSpec {
            spec: spec.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_error_interpreter_not_found() {
        let err = EnvironmentError::InterpreterNotFound;
        let msg = format!("{}", err);
        assert!(msg.contains("no base interpreter"));
        assert!(msg.contains("python3"));
    }

    #[test]
    fn test_environment_error_create_failed() {
        let err = EnvironmentError::CreateFailed {
            command: "python3 -m venv .venv".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "permission denied".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("environment creation failed"));
        assert!(msg.contains("python3 -m venv .venv"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_installer_error_passes_through_stderr() {
        let err = InstallerError::Failed {
            command: ".venv/bin/pip install nope".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "No matching distribution found for nope".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("installer failed"));
        assert!(msg.contains("No matching distribution found"));
    }

    #[test]
    fn test_installer_error_not_installed() {
        let err = InstallerError::not_installed("combine");
        let msg = format!("{}", err);
        assert!(msg.contains("pinned version of combine"));
    }

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("requirements.txt");
        let msg = format!("{}", err);
        assert!(msg.contains("requirements.txt"));
        assert!(msg.contains("managed installation"));
    }

    #[test]
    fn test_flow_error_foreign_workflow() {
        let err = FlowError::foreign_workflow("Poetry", "poetry update");
        let msg = format!("{}", err);
        assert!(msg.contains("Poetry"));
        assert!(msg.contains("poetry update"));
    }

    #[test]
    fn test_flow_error_existing_installation() {
        let err = FlowError::ExistingInstallation;
        let msg = format!("{}", err);
        assert!(msg.contains("--update"));
        assert!(msg.contains("--reinstall"));
    }

    #[test]
    fn test_flow_error_entrypoint_advice() {
        let err = FlowError::EntrypointNotOnPath {
            name: "combine".to_string(),
            bin_dir: ".venv/bin".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("could not find combine on PATH"));
        assert!(msg.contains("export PATH=\"./.venv/bin:$PATH\""));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let manifest_err = ManifestError::not_found("requirements.txt");
        let app_err: AppError = manifest_err.into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("requirements.txt"));
    }

    #[test]
    fn test_app_error_from_flow_error() {
        let flow_err = FlowError::ExistingInstallation;
        let app_err: AppError = flow_err.into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("existing installation"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("requirements.txt");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
