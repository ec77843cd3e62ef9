//! Resolver invocation.
//!
//! The resolution engine never talks to a subprocess directly; it goes through
//! the [`ResolverInvoker`] trait, handing over the complete, ordered list of
//! requirement strings for one phase in a single call. The resolver needs the
//! whole set at once to compute one mutually compatible solution.
//!
//! - [`CommandInvoker`] - Production implementation running the configured
//!   resolver program (default `uv add`)
//! - [`ResolverCommand`] - The underlying subprocess builder
//!
//! Invocation has a side effect by design: a successful call installs packages
//! and updates the project's lock/manifest files.

pub mod command_builder;

pub use command_builder::ResolverCommand;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;

use crate::config::ResolverSettings;
use crate::core::BootstrapError;

/// Outcome of one resolver invocation.
///
/// Created fresh per call and never retried internally; retrying with looser
/// requirements is the phase controller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverInvocationResult {
    /// Whether the resolver exited successfully
    pub succeeded: bool,
    /// Process exit code (`-1` when terminated by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ResolverInvocationResult {
    /// The text describing a failure: stderr, or stdout when stderr is empty.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Something that can run the resolver with a list of requirement strings.
///
/// Implementations must not return `Err` for a resolver that ran and failed;
/// that is an `Ok` result with `succeeded == false`. `Err` is reserved for
/// environment faults such as [`BootstrapError::ResolverNotFound`].
pub trait ResolverInvoker {
    /// Run the resolver once with every requirement string, in order.
    fn invoke(
        &self,
        requirements: &[String],
    ) -> impl Future<Output = Result<ResolverInvocationResult, BootstrapError>> + Send;
}

/// Runs the configured resolver program as a subprocess.
///
/// The requirement strings are appended after the configured base arguments,
/// so the default settings produce `uv add numpy==2.3.1 pandas==2.0.0`.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: String,
    base_args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl CommandInvoker {
    /// Create an invoker for `program` with base arguments.
    pub fn new<I, S>(program: impl Into<String>, base_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            base_args: base_args.into_iter().map(Into::into).collect(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    /// Create an invoker from the `[resolver]` configuration table.
    #[must_use]
    pub fn from_settings(settings: &ResolverSettings) -> Self {
        let mut env: Vec<(String, String)> =
            settings.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        env.sort();
        Self {
            program: settings.program.clone(),
            base_args: settings.args.clone(),
            working_dir: None,
            env,
        }
    }

    /// Run the resolver inside `dir` (the project root).
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The program this invoker runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the command for one invocation without running it.
    #[must_use]
    pub fn command(&self, requirements: &[String]) -> ResolverCommand {
        let mut cmd = ResolverCommand::new(&self.program)
            .args(self.base_args.iter().cloned())
            .args(requirements.iter().cloned())
            .with_context(format!("{} requirement(s)", requirements.len()));
        if let Some(dir) = &self.working_dir {
            cmd = cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd = cmd.env(key, value);
        }
        cmd
    }
}

impl ResolverInvoker for CommandInvoker {
    async fn invoke(
        &self,
        requirements: &[String],
    ) -> Result<ResolverInvocationResult, BootstrapError> {
        self.command(requirements).execute().await
    }
}
