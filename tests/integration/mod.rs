//! Integration test suite for pybootstrap
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **scenarios**: end-to-end phase controller runs through a scripted resolver
//! - **action_log**: JSON-lines action log written and read back
//! - **cli**: the `pybootstrap` binary against a fake resolver script (Unix only)

mod action_log;
#[cfg(unix)]
mod cli;
mod scenarios;
