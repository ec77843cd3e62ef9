//! pybootstrap - progressive dependency resolution for Python projects
//!
//! Installs a project's discovered packages through an external resolver
//! (`uv add` by default) and recovers from interpreter-version conflicts by
//! retrying with looser constraints:
//!
//! | Phase | Requirement string | Success means |
//! |---|---|---|
//! | Pinned | `numpy==2.3.1` | Exactly the discovered versions, fully reproducible |
//! | Ranged | `numpy>=2.3.1` | Floor versions kept, newer allowed |
//! | Unconstrained | `numpy` | Anything the resolver picks; reported with a lock-now warning |
//!
//! Failures that looser versions cannot fix (unknown package, network outage)
//! stop immediately with the resolver's own diagnostic. When every phase
//! fails, a report lists the conflicting packages and copy-pasteable
//! remediation commands.
//!
//! # Core Modules
//!
//! - [`resolver`] - Phase controller, resolution log and remediation guidance
//! - [`version`] - Requirement formatting, name extraction and conflict classification
//! - [`invoker`] - Running the external resolver as a subprocess
//! - [`models`] - [`PackageRequirement`](models::PackageRequirement) and requirement-list parsing
//!
//! ## Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Global configuration (`~/.pybootstrap/config.toml`)
//! - [`core`] - Error types and user-facing error formatting
//! - [`utils`] - Platform helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use pybootstrap_cli::invoker::CommandInvoker;
//! use pybootstrap_cli::models::parse_requirement_lines;
//! use pybootstrap_cli::resolver::ProgressiveResolver;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let requirements = parse_requirement_lines("numpy==2.3.1\npandas==2.0.0\n");
//! let resolver = ProgressiveResolver::new(CommandInvoker::new("uv", ["add"]).with_working_dir("./app"));
//! let resolution = resolver.resolve(&requirements).await?;
//! println!("{}", serde_json::to_string_pretty(&resolution.log)?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod invoker;
pub mod models;
pub mod resolver;
pub mod utils;
pub mod version;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
