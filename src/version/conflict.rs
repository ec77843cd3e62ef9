//! Python-version conflict classification.
//!
//! When the resolver fails, this module decides whether the failure is a
//! *Python-version incompatibility* (retryable by loosening version
//! constraints) or anything else (not retryable by the resolution engine).
//!
//! Classification is a pure function over the resolver's free-form diagnostic
//! text and never fails: unrecognized, empty or non-English text degrades to
//! "not a version conflict", and a recognized conflict whose packages cannot be
//! extracted degrades to "conflict with unknown specifics".
//!
//! # Recognized diagnostics
//!
//! These patterns track the wording emitted by `uv` and must be revisited when
//! the resolver changes its messages. A failure is a version conflict only when
//! the text contains **both** a no-solution phrase and a Python-version phrase:
//!
//! | No-solution phrases | Python-version phrases |
//! |---|---|
//! | `no solution found`, `resolutionimpossible`, `resolution impossible`, `unsatisfiable` | `python>=` and the other `python<op>` forms, `python version`, `requires-python`, `requires python` |
//!
//! The `for split (python_full_version >= '3.9' ...)` clause uv prints in the
//! header of any failure in a project split by Python version is removed
//! before matching. It names the split, not the cause, so a missing package
//! under that header still fails fast.
//!
//! Offending packages are extracted from two phrasings:
//!
//! ```text
//! numpy==2.3.1 depends on Python>=3.11
//! all versions of numpy depend on Python>=3.11
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use super::requirement::{extract_name, normalize_name};
use crate::invoker::ResolverInvocationResult;

const NO_SOLUTION_MARKERS: &[&str] = &[
    "no solution found",
    "resolutionimpossible",
    "resolution impossible",
    "unsatisfiable",
];

const PYTHON_VERSION_MARKERS: &[&str] = &[
    "python>=",
    "python>",
    "python<",
    "python==",
    "python~=",
    "python!=",
    "python version",
    "requires-python",
    "requires python",
];

/// `for split (python_full_version >= '3.9' and python_full_version < '3.11')`
static SPLIT_HEADER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\bfor\s+split\s*\([^)]*\)").ok());

/// `numpy==2.3.1 depends on Python>=3.11`
static DEPENDS_ON_PYTHON: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([A-Za-z0-9][A-Za-z0-9._-]*(?:\[[^\]]*\])?)\s*(===|==|>=|<=|~=|!=|>|<)\s*([A-Za-z0-9][A-Za-z0-9.*+!_-]*)\s+depends\s+on\s+python\s*(===|==|>=|<=|~=|!=|>|<)\s*([0-9][0-9A-Za-z.*]*)",
    )
    .ok()
});

/// `all versions of numpy depend on Python>=3.11`
static ALL_VERSIONS_DEPEND: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)all\s+versions\s+of\s+([A-Za-z0-9][A-Za-z0-9._-]*)\s+depends?\s+on\s+python\s*(===|==|>=|<=|~=|!=|>|<)\s*([0-9][0-9A-Za-z.*]*)",
    )
    .ok()
});

/// A package the resolver blamed for requiring a different interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffendingPackage {
    /// Normalized distribution name
    pub name: String,
    /// The constraint the resolver blamed (e.g. `==2.3.1`), when stated
    pub version_spec: Option<String>,
    /// The interpreter constraint of that version (e.g. `>=3.11`)
    pub required_python: String,
}

impl OffendingPackage {
    /// Version number from `version_spec`, without its operator.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version_spec.as_deref().map(|spec| spec.trim_start_matches(['=', '>', '<', '~', '!']))
    }

    /// The lower bound of `required_python` when it is a floor
    /// (`>=3.11` or `>3.10`), otherwise `None`.
    #[must_use]
    pub fn python_floor(&self) -> Option<&str> {
        let spec = self.required_python.trim();
        spec.strip_prefix(">=").or_else(|| spec.strip_prefix('>')).map(str::trim)
    }
}

impl fmt::Display for OffendingPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(spec) = &self.version_spec {
            write!(f, "{spec}")?;
        }
        write!(f, " requires Python{}", self.required_python)
    }
}

/// Classification of one failed resolver invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictVerdict {
    /// Whether the failure is retryable by loosening version constraints
    pub is_python_version_conflict: bool,
    /// Packages blamed by the diagnostic, in order of appearance; empty when
    /// extraction found nothing
    pub offending_packages: Vec<OffendingPackage>,
    /// The raw diagnostic the verdict was computed from
    pub diagnostic: String,
}

impl ConflictVerdict {
    /// Offending package names, in order of appearance.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.offending_packages.iter().map(|pkg| pkg.name.as_str())
    }

    /// One-line summary used in log output.
    #[must_use]
    pub fn summary(&self) -> String {
        if !self.is_python_version_conflict {
            return "not a Python-version conflict".to_string();
        }
        if self.offending_packages.is_empty() {
            return "Python-version conflict (packages could not be identified)".to_string();
        }
        let packages: Vec<String> =
            self.offending_packages.iter().map(ToString::to_string).collect();
        format!("Python-version conflict: {}", packages.join(", "))
    }
}

/// Classify a failed resolver invocation.
///
/// Only meaningful when `result.succeeded` is false; the diagnostic text is
/// taken from [`ResolverInvocationResult::diagnostic`].
#[must_use]
pub fn classify(result: &ResolverInvocationResult) -> ConflictVerdict {
    classify_diagnostic(result.diagnostic())
}

/// Classify raw diagnostic text.
///
/// ```rust
/// use pybootstrap_cli::version::classify_diagnostic;
///
/// let verdict = classify_diagnostic(
///     "No solution found when resolving dependencies:\n\
///      Because numpy==2.3.1 depends on Python>=3.11 and the requested Python version (>=3.9) \
///      does not satisfy Python>=3.11, we can conclude that numpy==2.3.1 cannot be used.",
/// );
/// assert!(verdict.is_python_version_conflict);
/// assert_eq!(verdict.offending_packages[0].name, "numpy");
/// assert_eq!(verdict.offending_packages[0].required_python, ">=3.11");
///
/// let verdict = classify_diagnostic("error: package `nope` was not found in the registry");
/// assert!(!verdict.is_python_version_conflict);
/// ```
#[must_use]
pub fn classify_diagnostic(diagnostic: &str) -> ConflictVerdict {
    let lowered = strip_split_header(diagnostic).to_lowercase();
    let no_solution = NO_SOLUTION_MARKERS.iter().any(|marker| lowered.contains(marker));
    let python_related = PYTHON_VERSION_MARKERS.iter().any(|marker| lowered.contains(marker));
    let is_python_version_conflict = no_solution && python_related;

    let offending_packages = if is_python_version_conflict {
        extract_offending_packages(diagnostic)
    } else {
        Vec::new()
    };

    tracing::debug!(
        target: "resolver::classify",
        "no_solution={} python_related={} offending={}",
        no_solution,
        python_related,
        offending_packages.len()
    );

    ConflictVerdict {
        is_python_version_conflict,
        offending_packages,
        diagnostic: diagnostic.to_string(),
    }
}

/// Best-effort extraction of `(package, required Python)` pairs.
///
/// Matches from both phrasings are merged in order of their position in the
/// text; the same package and version constraint is reported once.
#[must_use]
pub fn extract_offending_packages(diagnostic: &str) -> Vec<OffendingPackage> {
    let mut found: Vec<(usize, OffendingPackage)> = Vec::new();

    if let Some(re) = DEPENDS_ON_PYTHON.as_ref() {
        for caps in re.captures_iter(diagnostic) {
            let (Some(whole), Some(name), Some(op), Some(version), Some(py_op), Some(py_version)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3), caps.get(4), caps.get(5))
            else {
                continue;
            };
            let Some(name) = extract_name(name.as_str()) else {
                continue;
            };
            found.push((
                whole.start(),
                OffendingPackage {
                    name,
                    version_spec: Some(format!(
                        "{}{}",
                        op.as_str(),
                        trim_sentence_end(version.as_str())
                    )),
                    required_python: format!(
                        "{}{}",
                        py_op.as_str(),
                        trim_sentence_end(py_version.as_str())
                    ),
                },
            ));
        }
    }

    if let Some(re) = ALL_VERSIONS_DEPEND.as_ref() {
        for caps in re.captures_iter(diagnostic) {
            let (Some(whole), Some(name), Some(py_op), Some(py_version)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            found.push((
                whole.start(),
                OffendingPackage {
                    name: normalize_name(trim_sentence_end(name.as_str())),
                    version_spec: None,
                    required_python: format!(
                        "{}{}",
                        py_op.as_str(),
                        trim_sentence_end(py_version.as_str())
                    ),
                },
            ));
        }
    }

    found.sort_by_key(|(position, _)| *position);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, pkg)| pkg)
        .filter(|pkg| seen.insert((pkg.name.clone(), pkg.version_spec.clone())))
        .collect()
}

/// Remove uv's `for split (...)` clauses, which list environment markers
/// rather than the reason resolution failed.
fn strip_split_header(diagnostic: &str) -> Cow<'_, str> {
    match SPLIT_HEADER.as_ref() {
        Some(re) => re.replace_all(diagnostic, ""),
        None => Cow::Borrowed(diagnostic),
    }
}

/// Drop trailing sentence punctuation the version pattern may have swallowed
/// (`Python>=3.11.` at the end of a sentence).
fn trim_sentence_end(text: &str) -> &str {
    text.trim_end_matches('.')
}
