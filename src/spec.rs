//! Package specifier parsing
//!
//! Handles specifier formats:
//! - Bare name: `combine`
//! - Constrained: `combine==2.2.1`, `combine>=2.0`, `combine~=2.1`
//! - Path input: `./dist/combine` (package name is the final component)
//!
//! Name comparison is normalized: case-insensitive with `-`, `_`, and `.`
//! treated as equivalent separators.

use crate::error::FlowError;
use regex::Regex;
use std::sync::LazyLock;

/// Characters that start a version constraint in a specifier
const CONSTRAINT_CHARS: &[char] = &['>', '<', '~', '^', '=', '!'];

// Separator runs collapse to a single `-` for normalized comparison
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// A parsed package specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// The specifier exactly as given (handed to the installer verbatim,
    /// with constraint-escaping backslashes removed)
    raw: String,
    /// The package name portion
    name: String,
    /// The constraint portion, if any (operator included)
    constraint: Option<String>,
}

impl PackageSpec {
    /// Parse a package specifier from CLI input
    pub fn parse(input: &str) -> Result<Self, FlowError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(FlowError::invalid_spec(input, "specifier is empty"));
        }

        let raw = input.replace('\\', "");
        let (name, constraint) = match split_constraint(input) {
            Some(at) => {
                let name = input[..at].replace('\\', "");
                let constraint = input[at..].replace('\\', "");
                (name, Some(constraint))
            }
            None => (raw.clone(), None),
        };

        if name.is_empty() {
            return Err(FlowError::invalid_spec(input, "specifier has no package name"));
        }

        // Path inputs name the package by their final component
        let name = match name.rsplit('/').next() {
            Some(last) if !last.is_empty() => last.to_string(),
            _ => return Err(FlowError::invalid_spec(input, "path has no final component")),
        };

        Ok(Self {
            raw,
            name,
            constraint,
        })
    }

    /// The specifier as given, for passing to the installer
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The package name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraint portion including its operator, if one was given
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// True when no version constraint was given
    pub fn is_bare(&self) -> bool {
        self.constraint.is_none()
    }

    /// The normalized form of the package name
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether this spec names the given package (normalized comparison)
    pub fn matches(&self, other: &str) -> bool {
        self.normalized_name() == normalize_name(other)
    }
}

/// Index of the first unescaped constraint character, if any
fn split_constraint(input: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if CONSTRAINT_CHARS.contains(&c) {
            return Some(i);
        }
    }
    None
}

/// Normalize a package name for comparison: lowercase, with runs of
/// `-`, `_`, and `.` collapsed to a single `-`
pub fn normalize_name(name: &str) -> String {
    SEPARATOR_RE.replace_all(&name.to_lowercase(), "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name() {
        let spec = PackageSpec::parse("combine").unwrap();
        assert_eq!(spec.name(), "combine");
        assert_eq!(spec.raw(), "combine");
        assert!(spec.is_bare());
        assert!(spec.constraint().is_none());
    }

    #[test]
    fn test_parse_exact_constraint() {
        let spec = PackageSpec::parse("combine==2.2.1").unwrap();
        assert_eq!(spec.name(), "combine");
        assert_eq!(spec.raw(), "combine==2.2.1");
        assert_eq!(spec.constraint(), Some("==2.2.1"));
        assert!(!spec.is_bare());
    }

    #[test]
    fn test_parse_range_constraints() {
        let spec = PackageSpec::parse("combine>=2.0").unwrap();
        assert_eq!(spec.name(), "combine");
        assert_eq!(spec.constraint(), Some(">=2.0"));

        let spec = PackageSpec::parse("combine~=2.1").unwrap();
        assert_eq!(spec.name(), "combine");
        assert_eq!(spec.constraint(), Some("~=2.1"));

        let spec = PackageSpec::parse("combine^2.1").unwrap();
        assert_eq!(spec.name(), "combine");
        assert_eq!(spec.constraint(), Some("^2.1"));
    }

    #[test]
    fn test_parse_path_input() {
        let spec = PackageSpec::parse("./dist/combine").unwrap();
        assert_eq!(spec.name(), "combine");
        assert_eq!(spec.raw(), "./dist/combine");
    }

    #[test]
    fn test_parse_escaped_constraint_char() {
        // A backslash suppresses the constraint split and is stripped
        // from the value passed through to the installer
        let spec = PackageSpec::parse(r"weird\=name").unwrap();
        assert_eq!(spec.name(), "weird=name");
        assert_eq!(spec.raw(), "weird=name");
        assert!(spec.is_bare());
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(PackageSpec::parse("").is_err());
        assert!(PackageSpec::parse("   ").is_err());
    }

    #[test]
    fn test_parse_constraint_without_name_is_error() {
        assert!(PackageSpec::parse("==2.2.1").is_err());
    }

    #[test]
    fn test_parse_trailing_slash_is_error() {
        assert!(PackageSpec::parse("dist/").is_err());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Combine"), "combine");
        assert_eq!(normalize_name("my_tool"), "my-tool");
        assert_eq!(normalize_name("my.tool"), "my-tool");
        assert_eq!(normalize_name("My__Odd..Tool"), "my-odd-tool");
    }

    #[test]
    fn test_matches_normalized() {
        let spec = PackageSpec::parse("My_Tool==1.0").unwrap();
        assert!(spec.matches("my-tool"));
        assert!(spec.matches("MY.TOOL"));
        assert!(!spec.matches("my-tools"));
    }
}
