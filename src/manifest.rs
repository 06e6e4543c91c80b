//! Manifest file model and update operations
//!
//! This module provides:
//! - Line-typed parsing of the pin manifest (requirements.txt)
//! - Pin lookup by normalized package name
//! - In-place pin rewrite that preserves every other line verbatim
//! - Bootstrap rendering for a freshly created manifest
//!
//! Only exact `name==version` lines are treated as pins; everything else
//! (comments, blanks, editable installs, range constraints) passes through
//! untouched.

use crate::error::ManifestError;
use crate::spec::normalize_name;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Conventional manifest filename
pub const FILE_NAME: &str = "requirements.txt";

// Exact pin lines: `name==version`, optional surrounding whitespace
static PIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)\s*==\s*([^\s#]+)\s*$").unwrap()
});

/// One line of the manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `#`-prefixed comment, preserved verbatim
    Comment(String),
    /// Empty or whitespace-only line
    Blank(String),
    /// Exact version pin
    Pin {
        name: String,
        version: String,
        raw: String,
    },
    /// Any other constraint or directive, preserved verbatim
    Other(String),
}

impl Line {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Line::Blank(raw.to_string());
        }
        if trimmed.starts_with('#') {
            return Line::Comment(raw.to_string());
        }
        if let Some(caps) = PIN_RE.captures(raw) {
            return Line::Pin {
                name: caps[1].to_string(),
                version: caps[2].to_string(),
                raw: raw.to_string(),
            };
        }
        Line::Other(raw.to_string())
    }

    fn render(&self) -> &str {
        match self {
            Line::Comment(raw) | Line::Blank(raw) | Line::Other(raw) => raw,
            Line::Pin { raw, .. } => raw,
        }
    }
}

/// The pin manifest: an ordered sequence of lines
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    lines: Vec<Line>,
}

impl Manifest {
    /// The manifest path for a project root
    pub fn path_in(project_root: &Path) -> PathBuf {
        project_root.join(FILE_NAME)
    }

    /// Load a manifest from disk
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::not_found(path)
            } else {
                ManifestError::read(path, e)
            }
        })?;
        Ok(Self::from_content(path, &content))
    }

    /// Parse manifest content without touching the filesystem
    pub fn from_content(path: &Path, content: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: content.lines().map(Line::parse).collect(),
        }
    }

    /// Render a brand-new manifest holding a single pin under the
    /// managed-file header. Only the tool itself is pinned; transitive
    /// dependencies are never frozen into the manifest.
    pub fn bootstrap(path: &Path, name: &str, version: &str) -> Self {
        let content = format!(
            "# This file is managed automatically by {}\n{}=={}\n",
            name, name, version
        );
        Self::from_content(path, &content)
    }

    /// The path this manifest reads from and writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed lines, in file order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The pinned version for a package, if one exists (normalized
    /// name comparison)
    pub fn pinned_version(&self, name: &str) -> Option<&str> {
        let wanted = normalize_name(name);
        self.lines.iter().find_map(|line| match line {
            Line::Pin {
                name: pin_name,
                version,
                ..
            } if normalize_name(pin_name) == wanted => Some(version.as_str()),
            _ => None,
        })
    }

    /// Rewrite the pin line for a package in place, or append one if no
    /// line for the package exists. All other lines are preserved
    /// verbatim and in position.
    pub fn set_pin(&mut self, name: &str, version: &str) {
        let wanted = normalize_name(name);
        let rendered = format!("{}=={}", name, version);

        for line in self.lines.iter_mut() {
            if let Line::Pin { name: pin_name, .. } = line {
                if normalize_name(pin_name) == wanted {
                    *line = Line::Pin {
                        name: name.to_string(),
                        version: version.to_string(),
                        raw: rendered,
                    };
                    return;
                }
            }
        }

        self.lines.push(Line::Pin {
            name: name.to_string(),
            version: version.to_string(),
            raw: rendered,
        });
    }

    /// Render the manifest back to file content
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.render());
            out.push('\n');
        }
        out
    }

    /// Write the manifest back to its path
    pub fn save(&self) -> Result<(), ManifestError> {
        fs::write(&self.path, self.render()).map_err(|e| ManifestError::write(&self.path, e))
    }
}
