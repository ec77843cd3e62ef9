//! Test utilities for pybootstrap
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration test suites:
//!
//! - [`ScriptedInvoker`] - a [`ResolverInvoker`](crate::invoker::ResolverInvoker)
//!   that replays canned results and records every call
//! - [`fixtures`] - resolver diagnostics in the shapes `uv` prints
//! - [`init_test_logging`] - opt-in tracing output for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use pybootstrap_cli::models::PackageRequirement;
//! use pybootstrap_cli::resolver::ProgressiveResolver;
//! use pybootstrap_cli::test_utils::{ScriptedInvoker, fixtures};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let invoker = ScriptedInvoker::new()
//!     .then_fail(&fixtures::python_conflict("numpy", "2.3.1", "3.11"))
//!     .then_succeed();
//! let resolver = ProgressiveResolver::new(invoker);
//! let resolution = resolver.resolve(&[PackageRequirement::new("numpy", Some("2.3.1"))]).await?;
//! assert_eq!(resolver.invoker().call_count(), 2);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod invoker;

pub use invoker::ScriptedInvoker;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `None`, logging is enabled only
/// when `RUST_LOG` is set.
///
/// ```bash
/// RUST_LOG=resolver=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true) // Show targets like "resolver::classify"
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
