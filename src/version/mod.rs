//! Requirement strings and resolver-diagnostic analysis.
//!
//! This module holds the pure, subprocess-free pieces of the resolution engine:
//!
//! - [`requirement`] - Render requirements per phase, extract and normalize names
//! - [`conflict`] - Classify resolver failures as Python-version conflicts or not
//!
//! Everything here is deterministic and infallible, so it can be exercised in
//! isolation from the resolver process.

pub mod conflict;
pub mod requirement;

pub use conflict::{
    ConflictVerdict, OffendingPackage, classify, classify_diagnostic, extract_offending_packages,
};
pub use requirement::{extract_name, format_all, format_requirement, is_valid_name, normalize_name};
