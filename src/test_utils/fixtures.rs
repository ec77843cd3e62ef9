//! Resolver diagnostics shaped like `uv add` output.

/// A Python-version conflict naming `package==version`.
#[must_use]
pub fn python_conflict(package: &str, version: &str, python: &str) -> String {
    format!(
        "  × No solution found when resolving dependencies for split (python_full_version >= '3.9' and python_full_version < '{python}'):\n  \
         ╰─▶ Because the requested Python version (>=3.9) does not satisfy Python>={python} and {package}=={version} depends on Python>={python}, \
         we can conclude that {package}=={version} cannot be used.\n      \
         And because your project depends on {package}=={version}, we can conclude that your project's requirements are unsatisfiable.\n"
    )
}

/// A Python-version conflict on a range constraint.
#[must_use]
pub fn ranged_python_conflict(package: &str, version: &str, python: &str) -> String {
    format!(
        "  × No solution found when resolving dependencies:\n  \
         ╰─▶ Because only {package}>={version} is available and {package}>={version} depends on Python>={python}, \
         we can conclude that {package}>={version} cannot be used.\n      \
         And because your project depends on {package}>={version}, we can conclude that your project's requirements are unsatisfiable.\n"
    )
}

/// A failure for a package that does not exist in the index.
#[must_use]
pub fn package_not_found(package: &str) -> String {
    format!(
        "  × No solution found when resolving dependencies:\n  \
         ╰─▶ Because {package} was not found in the package registry and your project depends on {package}, \
         we can conclude that your project's requirements are unsatisfiable.\n"
    )
}

/// A missing package reported under uv's split-by-Python-version header.
#[must_use]
pub fn split_package_not_found(package: &str) -> String {
    format!(
        "  × No solution found when resolving dependencies for split (python_full_version >= '3.9' and python_full_version < '3.11'):\n  \
         ╰─▶ Because {package} was not found in the package registry and your project depends on {package}, \
         we can conclude that your project's requirements are unsatisfiable.\n"
    )
}

/// A network failure reaching the package index.
#[must_use]
pub fn network_error() -> &'static str {
    "error: Failed to fetch: `https://pypi.org/simple/numpy/`\n  Caused by: Request failed after 3 retries\n  Caused by: dns error: failed to lookup address information\n"
}

/// A Python-version conflict from which no package can be extracted.
#[must_use]
pub fn unparseable_python_conflict() -> &'static str {
    "No solution found when resolving dependencies: the current Python version is incompatible with something in the dependency tree\n"
}
