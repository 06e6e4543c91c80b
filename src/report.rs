//! Install report types
//!
//! Every successful flow produces an InstallReport; the CLI renders it as
//! a success line or, with --json, serializes it for machine processing.

use colored::Colorize;
use semver::Version;
use serde::Serialize;
use std::path::PathBuf;

/// Which flow was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fresh environment and fresh manifest
    Create,
    /// Environment recreated from an existing manifest
    Install,
    /// Existing installation moved to a new (or re-resolved) version
    Update,
    /// Environment and manifest destroyed, then created again
    Reinstall,
}

impl Mode {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Install => "install",
            Mode::Update => "update",
            Mode::Reinstall => "reinstall",
        }
    }

    /// Past-tense verb for the success line
    pub fn verb(&self) -> &'static str {
        match self {
            Mode::Create | Mode::Install | Mode::Reinstall => "installed",
            Mode::Update => "updated",
        }
    }
}

/// Semantic version change class between the previous pin and the
/// newly resolved version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionChange {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Same version as before
    Unchanged,
    /// Unparseable on either side
    Unknown,
}

impl VersionChange {
    /// Classify the change from a previous pin, if one existed
    pub fn from_versions(previous: Option<&str>, new: &str) -> Option<Self> {
        let previous = previous?;
        let parse = |v: &str| Version::parse(v.strip_prefix('v').unwrap_or(v)).ok();

        Some(match (parse(previous), parse(new)) {
            (Some(old), Some(new)) => {
                if old == new {
                    VersionChange::Unchanged
                } else if old.major != new.major {
                    VersionChange::Major
                } else if old.minor != new.minor {
                    VersionChange::Minor
                } else {
                    VersionChange::Patch
                }
            }
            _ if previous == new => VersionChange::Unchanged,
            _ => VersionChange::Unknown,
        })
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChange::Major => "major",
            VersionChange::Minor => "minor",
            VersionChange::Patch => "patch",
            VersionChange::Unchanged => "unchanged",
            VersionChange::Unknown => "?",
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChange::Major => "major".red().bold().to_string(),
            VersionChange::Minor => "minor".yellow().to_string(),
            VersionChange::Patch => "patch".green().to_string(),
            VersionChange::Unchanged => "unchanged".dimmed().to_string(),
            VersionChange::Unknown => "?".dimmed().to_string(),
        }
    }
}

/// Result of a successful install/update flow
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Package name as pinned
    pub package: String,
    /// Version now installed and pinned
    pub version: String,
    /// Version pinned before this run, if any
    pub previous_version: Option<String>,
    /// Flow that was executed
    pub mode: Mode,
    /// Manifest file that records the pin
    pub manifest: PathBuf,
    /// Change class relative to the previous pin
    pub change: Option<VersionChange>,
}

impl InstallReport {
    /// Build a report, classifying the version change
    pub fn new(
        package: impl Into<String>,
        version: impl Into<String>,
        previous_version: Option<String>,
        mode: Mode,
        manifest: impl Into<PathBuf>,
    ) -> Self {
        let version = version.into();
        let change = VersionChange::from_versions(previous_version.as_deref(), &version);
        Self {
            package: package.into(),
            version,
            previous_version,
            mode,
            manifest: manifest.into(),
            change,
        }
    }

    /// The pinned constraint, `package==version`
    pub fn pin(&self) -> String {
        format!("{}=={}", self.package, self.version)
    }

    /// The success line shown at the end of a run
    pub fn success_line(&self) -> String {
        match (self.mode, self.change) {
            (Mode::Update, Some(VersionChange::Unchanged)) => {
                format!("{} is already up to date ({})", self.package, self.version)
            }
            (Mode::Update, Some(change)) => format!(
                "Successfully updated {} ({} -> {}, {})",
                self.package,
                self.previous_version.as_deref().unwrap_or("?"),
                self.version,
                change.label()
            ),
            _ => format!("Successfully {} {}!", self.mode.verb(), self.pin()),
        }
    }
}
