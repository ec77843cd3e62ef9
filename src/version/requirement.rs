//! Requirement string formatting and package-name extraction.
//!
//! Two pure functions sit at the bottom of the resolution engine:
//!
//! - [`format_requirement`] renders a [`PackageRequirement`] into the string the
//!   resolver understands for a given [`ResolutionPhase`].
//! - [`extract_name`] recovers the bare, normalized distribution name from any
//!   requirement string a user might write.
//!
//! The two are inverses modulo normalization:
//! `extract_name(&format_requirement(req, phase)) == Some(req.normalized_name())`
//! for every phase.
//!
//! # Examples
//!
//! ```rust
//! use pybootstrap_cli::models::PackageRequirement;
//! use pybootstrap_cli::resolver::ResolutionPhase;
//! use pybootstrap_cli::version::{extract_name, format_requirement};
//!
//! let req = PackageRequirement::new("numpy", Some("2.3.1"));
//! assert_eq!(format_requirement(&req, ResolutionPhase::Pinned), "numpy==2.3.1");
//! assert_eq!(format_requirement(&req, ResolutionPhase::Ranged), "numpy>=2.3.1");
//! assert_eq!(format_requirement(&req, ResolutionPhase::Unconstrained), "numpy");
//!
//! assert_eq!(extract_name("Django[bcrypt,argon2]~=3.0").as_deref(), Some("django"));
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::models::PackageRequirement;
use crate::resolver::ResolutionPhase;

/// Runs of name separators that package indexes treat as one `-`.
static NAME_SEPARATORS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[-_.]+").ok());

/// Characters that end the name segment of a requirement string.
///
/// Covers every PEP 440 comparison operator (`==`, `>=`, `<=`, `~=`, `!=`,
/// `>`, `<`, `===`), extras (`[`), environment markers (`;`) and direct
/// references (`@`).
const NAME_TERMINATORS: &[char] = &['=', '>', '<', '~', '!', '[', ';', '@'];

/// Normalize a distribution name for comparison.
///
/// Lower-cases the name and collapses every run of `-`, `_` and `.` into a
/// single `-`, the same rule package indexes use for name identity.
///
/// ```rust
/// use pybootstrap_cli::version::normalize_name;
///
/// assert_eq!(normalize_name("Scikit_Learn"), "scikit-learn");
/// assert_eq!(normalize_name("zope.interface"), "zope-interface");
/// assert_eq!(normalize_name("a--_.b"), "a-b");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    match NAME_SEPARATORS.as_ref() {
        Some(re) => re.replace_all(name, "-").to_lowercase(),
        None => name.to_lowercase(),
    }
}

/// Whether `name` is a syntactically valid distribution name.
///
/// Names are ASCII letters, digits, `-`, `_` and `.`, and must start and end
/// with a letter or digit.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        }
        _ => false,
    }
}

/// Split a requirement string at the first operator, extras bracket, marker or
/// direct reference and return the trimmed left-hand segment.
pub(crate) fn name_segment(spec: &str) -> &str {
    let end = spec.find(NAME_TERMINATORS).unwrap_or(spec.len());
    spec[..end].trim()
}

/// Extract the bare, normalized distribution name from a requirement string.
///
/// Accepts exact pins (`foo==1.2.3`), ranges (`foo>=1.2.3`), compatible
/// releases (`foo~=1.2`), extras (`foo[bar]==1.2.3`) and environment markers
/// (`foo==1.2.3; sys_platform=="win32"`).
///
/// Returns `None` for empty or malformed input instead of failing, so callers
/// looping over many user-declared requirements can skip a bad entry without
/// aborting the batch.
///
/// ```rust
/// use pybootstrap_cli::version::extract_name;
///
/// assert_eq!(extract_name("requests>=2.31").as_deref(), Some("requests"));
/// assert_eq!(extract_name("foo[bar]==1.2.3").as_deref(), Some("foo"));
/// assert_eq!(extract_name("pywin32==306; sys_platform == \"win32\"").as_deref(), Some("pywin32"));
/// assert_eq!(extract_name("==1.0"), None);
/// assert_eq!(extract_name("   "), None);
/// ```
#[must_use]
pub fn extract_name(requirement_spec: &str) -> Option<String> {
    let segment = name_segment(requirement_spec);
    if is_valid_name(segment) {
        Some(normalize_name(segment))
    } else {
        None
    }
}

/// The name a requirement is rendered with: any version operator, extras or
/// marker embedded in the name field is dropped, original casing is kept.
fn bare_name(requirement: &PackageRequirement) -> &str {
    let segment = name_segment(&requirement.name);
    if segment.is_empty() {
        requirement.name.trim()
    } else {
        segment
    }
}

/// Render a requirement for the given resolution phase.
///
/// | Phase | With exact version | Without |
/// |---|---|---|
/// | `Pinned` | `name==version` | `name` |
/// | `Ranged` | `name>=version` | `name` |
/// | `Unconstrained` | `name` | `name` |
///
/// Missing versions degrade silently to the bare name, so one phase may mix
/// pinned and unpinned requirements. The function is pure and idempotent.
#[must_use]
pub fn format_requirement(requirement: &PackageRequirement, phase: ResolutionPhase) -> String {
    let name = bare_name(requirement);
    let version = requirement.exact_version.as_deref().map(str::trim).filter(|v| !v.is_empty());

    match (phase, version) {
        (ResolutionPhase::Pinned, Some(version)) => format!("{name}=={version}"),
        (ResolutionPhase::Ranged, Some(version)) => format!("{name}>={version}"),
        _ => name.to_string(),
    }
}

/// Render every requirement for a phase, preserving input order.
#[must_use]
pub fn format_all(requirements: &[PackageRequirement], phase: ResolutionPhase) -> Vec<String> {
    requirements.iter().map(|req| format_requirement(req, phase)).collect()
}
