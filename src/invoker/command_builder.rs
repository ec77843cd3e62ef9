//! Builder for resolver subprocess invocations.
//!
//! [`ResolverCommand`] is a fluent builder around [`tokio::process::Command`]
//! that always captures output and never turns a non-zero exit status into an
//! error: the exit status is data for the conflict classifier. Only the
//! absence of the executable (or an operating-system refusal to start it) is
//! reported as an error.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::ResolverInvocationResult;
use crate::core::BootstrapError;
use crate::utils::platform::find_executable;

/// Builder for a single resolver process invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use pybootstrap_cli::invoker::ResolverCommand;
///
/// # async fn example() -> Result<(), pybootstrap_cli::core::BootstrapError> {
/// let result = ResolverCommand::new("uv")
///     .args(["add", "numpy==2.3.1", "pandas==2.0.0"])
///     .current_dir("/path/to/project")
///     .env("UV_NO_PROGRESS", "1")
///     .with_context("pinned")
///     .execute()
///     .await?;
///
/// if !result.succeeded {
///     eprintln!("resolver exited with {}: {}", result.exit_code, result.stderr);
/// }
/// # Ok(())
/// # }
/// ```
///
/// There is deliberately no timeout: the resolver is expected to fail fast on
/// unsatisfiable constraints, and callers wanting a wall-clock budget wrap the
/// whole resolution in `tokio::time::timeout`.
#[derive(Debug, Clone)]
pub struct ResolverCommand {
    /// Program to run, a bare name looked up on PATH or a path
    program: String,

    /// Arguments, in order
    args: Vec<String>,

    /// Working directory (defaults to the current process directory)
    current_dir: Option<PathBuf>,

    /// Extra environment variables for the resolver process
    env_vars: Vec<(String, String)>,

    /// Optional context string for log messages
    context: Option<String>,
}

impl ResolverCommand {
    /// Creates a builder for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            context: None,
        }
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments, preserving order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory for the resolver process.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an environment variable for the resolver process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Sets a context label included in log messages.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The program this command runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The label used in log messages, when set.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The arguments this command passes, in order.
    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Run the command to completion and capture its output.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::ResolverNotFound`] when the program cannot be found
    /// - [`BootstrapError::ResolverSpawnFailed`] when it exists but cannot start
    ///
    /// A non-zero exit status is returned as `Ok` with `succeeded == false`.
    pub async fn execute(self) -> Result<ResolverInvocationResult, BootstrapError> {
        let start = std::time::Instant::now();
        let ctx = self.context.as_deref().unwrap_or("resolver");

        let executable = find_executable(&self.program).ok_or_else(|| {
            tracing::error!(target: "resolver::invoke", "({}) '{}' not found in PATH", ctx, self.program);
            BootstrapError::ResolverNotFound {
                program: self.program.clone(),
            }
        })?;

        tracing::debug!(
            target: "resolver::invoke",
            "({}) Executing command: {} {}",
            ctx,
            executable.display(),
            self.args.join(" ")
        );

        let mut cmd = Command::new(&executable);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "resolver::invoke", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BootstrapError::ResolverNotFound {
                    program: self.program.clone(),
                }
            } else {
                BootstrapError::ResolverSpawnFailed {
                    program: self.program.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        // Killed by a signal: no exit code
        let exit_code = output.status.code().unwrap_or(-1);

        if output.status.success() {
            tracing::debug!(target: "resolver::invoke", "({}) Command completed successfully", ctx);
        } else {
            tracing::debug!(target: "resolver::invoke", "({}) Command failed with exit code: {}", ctx, exit_code);
        }
        if !stdout.is_empty() {
            tracing::debug!(target: "resolver::invoke", "({}) {}", ctx, stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "resolver::invoke", "({}) {}", ctx, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "resolver::perf", "({}) {} took {:.2}s", ctx, self.program, elapsed.as_secs_f64());
        }

        Ok(ResolverInvocationResult {
            succeeded: output.status.success(),
            exit_code,
            stdout,
            stderr,
        })
    }
}
