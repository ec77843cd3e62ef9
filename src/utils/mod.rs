//! Cross-platform utilities
//!
//! - [`platform`] - Home directory, path expansion and executable lookup

pub mod platform;

pub use platform::{command_exists, find_executable, get_home_dir, is_windows, resolve_path};
