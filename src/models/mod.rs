//! Shared data models for pybootstrap
//!
//! [`PackageRequirement`] is the unit of input to the resolution engine: one
//! discovered third-party package, optionally with the exact version that is
//! currently importable. Requirements are immutable; every resolution phase
//! derives a fresh requirement string from the same value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::BootstrapError;
use crate::version::requirement::name_segment;
use crate::version::{is_valid_name, normalize_name};

/// A single desired dependency.
///
/// Identity is case-insensitive: compare with [`same_package`](Self::same_package)
/// or [`normalized_name`](Self::normalized_name) rather than the raw `name`.
///
/// # Examples
///
/// ```rust
/// use pybootstrap_cli::models::PackageRequirement;
///
/// let req = PackageRequirement::new("NumPy", Some("2.3.1"));
/// assert_eq!(req.normalized_name(), "numpy");
/// assert!(req.same_package(&PackageRequirement::new("numpy", None)));
///
/// let parsed = PackageRequirement::parse("pandas==2.0.0").unwrap();
/// assert_eq!(parsed.exact_version.as_deref(), Some("2.0.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequirement {
    /// Distribution name as discovered (original casing)
    pub name: String,
    /// Exact importable version, when discovery could determine it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_version: Option<String>,
}

impl PackageRequirement {
    /// Create a requirement from a name and optional exact version.
    pub fn new(name: impl Into<String>, exact_version: Option<&str>) -> Self {
        Self {
            name: name.into(),
            exact_version: exact_version.map(str::to_string),
        }
    }

    /// Parse a single user-supplied requirement such as `numpy`, `numpy==2.3.1`
    /// or `Django[bcrypt]>=3.0`.
    ///
    /// Only an exact `==` pin is kept as the exact version; any other operator
    /// keeps just the name.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::InvalidRequirement`] when no valid package
    /// name can be found.
    pub fn parse(spec: &str) -> Result<Self, BootstrapError> {
        let name = name_segment(spec);
        if !is_valid_name(name) {
            return Err(BootstrapError::InvalidRequirement {
                input: spec.to_string(),
                reason: "expected a package name optionally followed by ==version".to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            exact_version: exact_pin(spec),
        })
    }

    /// Lower-cased, separator-normalized name used for identity.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(name_segment(&self.name))
    }

    /// Whether both requirements refer to the same distribution.
    #[must_use]
    pub fn same_package(&self, other: &Self) -> bool {
        self.normalized_name() == other.normalized_name()
    }
}

impl fmt::Display for PackageRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exact_version {
            Some(version) => write!(f, "{}=={}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The exact version of a `==` pin, ignoring extras and markers.
fn exact_pin(spec: &str) -> Option<String> {
    let without_marker = spec.split(';').next().unwrap_or_default();
    let start = without_marker.find(['=', '>', '<', '~', '!', '[', '@'])?;
    let mut constraint = &without_marker[start..];
    if constraint.starts_with('[') {
        constraint = &constraint[constraint.find(']')? + 1..];
    }

    let version = constraint.trim().strip_prefix("==")?;
    if version.starts_with('=') || version.contains(',') || version.contains('*') {
        return None;
    }
    let version = version.trim();
    if version.is_empty() || version.contains(char::is_whitespace) {
        return None;
    }
    Some(version.to_string())
}

/// Parse requirements-file style text into requirements.
///
/// Comments, blank lines and option lines (`-r other.txt`, `-e .`,
/// `--index-url ...`) are skipped. Malformed lines are logged and skipped;
/// one bad entry never aborts the batch.
///
/// ```rust
/// use pybootstrap_cli::models::parse_requirement_lines;
///
/// let reqs = parse_requirement_lines("numpy==2.3.1\n# comment\nrequests>=2\n-e .\n==broken\n");
/// assert_eq!(reqs.len(), 2);
/// assert_eq!(reqs[0].exact_version.as_deref(), Some("2.3.1"));
/// assert_eq!(reqs[1].exact_version, None);
/// ```
#[must_use]
pub fn parse_requirement_lines(text: &str) -> Vec<PackageRequirement> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.split(" #").next().unwrap_or_default().trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                return None;
            }
            match PackageRequirement::parse(line) {
                Ok(req) => Some(req),
                Err(e) => {
                    tracing::warn!("Skipping requirement on line {}: {}", index + 1, e);
                    None
                }
            }
        })
        .collect()
}
