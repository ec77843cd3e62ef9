//! Platform helpers: home directory, path expansion and executable lookup.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pybootstrap_cli::utils::platform::{command_exists, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let log = resolve_path("~/.pybootstrap/actions.jsonl")?;
//! println!("Action log: {}", log.display());
//!
//! if !command_exists("uv") {
//!     eprintln!("uv is not installed");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// The user's home directory.
///
/// # Errors
///
/// Returns an error when neither `HOME` nor `USERPROFILE` can be resolved.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Expand a leading `~/` and `$VAR` / `${VAR}` references in a path.
///
/// ```rust,no_run
/// use pybootstrap_cli::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let path = resolve_path("$HOME/logs/actions.jsonl")?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error for `~user` forms, which are not supported, for an
/// undefined environment variable, or when the home directory is unknown.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = if let Some(stripped) = path.strip_prefix("~/") {
        get_home_dir()?.join(stripped)
    } else if path == "~" {
        get_home_dir()?
    } else if path.starts_with('~') {
        return Err(anyhow::anyhow!(
            "Invalid path: {path}\n\n\
            Tilde expansion only supports '~/' for the home directory.\n\
            Use '~/' followed by a relative path, like '~/.pybootstrap/actions.jsonl'"
        ));
    } else {
        PathBuf::from(path)
    };

    let path_str = expanded.to_string_lossy();
    let expanded_str = shellexpand::env(&path_str)
        .with_context(|| {
            format!(
                "Failed to expand environment variables in path: {path_str}\n\n\
                Check for an undefined variable (e.g. $UNDEFINED_VAR) or invalid syntax (use $VAR or ${{VAR}})"
            )
        })?
        .into_owned();

    Ok(PathBuf::from(expanded_str))
}

/// Locate an executable, searching PATH for bare names.
///
/// A name containing a path separator is checked as a path.
#[must_use]
pub fn find_executable(program: &str) -> Option<PathBuf> {
    match which::which(program) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::trace!("'{}' not found: {}", program, e);
            None
        }
    }
}

/// Whether a command is available.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    find_executable(cmd).is_some()
}
