//! Core types for pybootstrap
//!
//! This module holds the error taxonomy shared by every other module:
//! - [`BootstrapError`] - Enumerated error types for precise handling in code
//! - [`ErrorContext`] - User-friendly wrapper with details and suggestions
//! - [`user_friendly_error`] - Convert any [`anyhow::Error`] for CLI display
//!
//! # Error First Design
//!
//! Every operation that can fail returns a [`Result`]. Library entry points
//! that callers must branch on (the resolution engine, the resolver invoker)
//! return `Result<_, BootstrapError>`; glue code (configuration loading, the
//! CLI) uses [`anyhow::Result`] with context.

pub mod error;

pub use error::{BootstrapError, ErrorContext, user_friendly_error};
