//! Configuration management for pybootstrap
//!
//! A single optional TOML file holds user-wide settings:
//!
//! - **Location**: `~/.pybootstrap/config.toml`, or any path passed with `--config`
//! - **Missing file**: every setting falls back to its default
//! - **Precedence**: command-line flags override file values
//!
//! ```toml
//! action_log = "~/.pybootstrap/actions.jsonl"
//! fallback_python = "3.12"
//!
//! [resolver]
//! program = "uv"
//! args = ["add"]
//!
//! [resolver.env]
//! UV_NO_PROGRESS = "1"
//! ```

pub mod global;

pub use global::{GlobalConfig, ResolverSettings};
