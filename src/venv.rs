//! Isolated environment layout
//!
//! The environment lives at a fixed relative path under the project root
//! and is only ever mutated wholesale (created once, destroyed and
//! recreated on reinstall) or by the installer running inside it.

use std::env;
use std::path::{Path, PathBuf};

/// Conventional environment directory name
pub const ENV_DIR: &str = ".venv";

/// Executable directory name inside the environment
#[cfg(not(windows))]
pub const BIN_DIR: &str = "bin";
#[cfg(windows)]
pub const BIN_DIR: &str = "Scripts";

#[cfg(not(windows))]
const EXE_SUFFIX: &str = "";
#[cfg(windows)]
const EXE_SUFFIX: &str = ".exe";

/// Paths of an isolated environment under a project root
#[derive(Debug, Clone)]
pub struct EnvLayout {
    project_root: PathBuf,
}

impl EnvLayout {
    /// Layout rooted at the given project directory
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// The project directory the environment belongs to
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The environment directory
    pub fn env_dir(&self) -> PathBuf {
        self.project_root.join(ENV_DIR)
    }

    /// The environment's executable directory
    pub fn bin_dir(&self) -> PathBuf {
        self.env_dir().join(BIN_DIR)
    }

    /// The environment's package installer executable
    pub fn pip_path(&self) -> PathBuf {
        self.bin_dir().join(format!("pip{}", EXE_SUFFIX))
    }

    /// The project's manifest file
    pub fn manifest_path(&self) -> PathBuf {
        crate::manifest::Manifest::path_in(&self.project_root)
    }

    /// Whether the environment directory exists
    pub fn exists(&self) -> bool {
        self.env_dir().exists()
    }

    /// Whether a path lies inside the environment directory
    pub fn contains(&self, path: &Path) -> bool {
        let env_dir = match self.env_dir().canonicalize() {
            Ok(dir) => dir,
            Err(_) => self.env_dir(),
        };
        let path = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => path.to_path_buf(),
        };
        path.starts_with(env_dir)
    }

    /// The executable directory as shown in user-facing messages
    pub fn bin_dir_display(&self) -> String {
        format!("{}/{}", ENV_DIR, BIN_DIR)
    }
}

/// Locate the base interpreter used to create environments
pub fn find_base_interpreter() -> Option<PathBuf> {
    ["python3", "python"]
        .iter()
        .find_map(|name| find_in_path(name))
}

/// Resolve an executable name against the PATH search path
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    for dir in env::split_paths(&paths) {
        let candidate = dir.join(format!("{}{}", name, EXE_SUFFIX));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
