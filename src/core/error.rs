//! Error handling for pybootstrap
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`BootstrapError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for CLI users
//!
//! Expected resolution failures (version conflicts, unknown packages, network
//! outages reported by the resolver) are *not* errors: the resolution engine
//! reports them as [`ResolutionOutcome`](crate::resolver::ResolutionOutcome)
//! variants. [`BootstrapError`] is reserved for conditions the engine cannot
//! express as an outcome, chiefly a resolver executable that does not exist.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pybootstrap_cli::core::{BootstrapError, ErrorContext, user_friendly_error};
//!
//! let error = BootstrapError::ResolverNotFound {
//!     program: "uv".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows coloured error with an install suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::resolver::ResolutionPhase;

/// The main error type for pybootstrap operations.
///
/// # Error Categories
///
/// ## Resolver process
/// - [`ResolverNotFound`] - The resolver executable is not installed (fatal)
/// - [`ResolverSpawnFailed`] - The executable exists but could not be started
/// - [`ResolverFailed`] - The resolver failed for a reason loosening versions cannot fix
/// - [`ResolutionExhausted`] - Every resolution phase failed
///
/// ## Input and configuration
/// - [`InvalidRequirement`] - A requirement string could not be parsed
/// - [`ConfigError`] - The configuration file is unusable
/// - [`ActionLogError`] - The JSON action log could not be read or written
///
/// [`ResolverNotFound`]: BootstrapError::ResolverNotFound
/// [`ResolverSpawnFailed`]: BootstrapError::ResolverSpawnFailed
/// [`ResolverFailed`]: BootstrapError::ResolverFailed
/// [`ResolutionExhausted`]: BootstrapError::ResolutionExhausted
/// [`InvalidRequirement`]: BootstrapError::InvalidRequirement
/// [`ConfigError`]: BootstrapError::ConfigError
/// [`ActionLogError`]: BootstrapError::ActionLogError
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Resolver executable not found on PATH.
    ///
    /// This is the only environment-level fault the resolution engine
    /// propagates. It is distinct from every dependency conflict and is never
    /// retried.
    #[error("Resolver executable '{program}' is not installed or not found in PATH")]
    ResolverNotFound {
        /// The program that was looked up
        program: String,
    },

    /// The resolver executable exists but the operating system refused to run it
    #[error("Failed to start resolver '{program}': {reason}")]
    ResolverSpawnFailed {
        /// The program that failed to start
        program: String,
        /// Operating system error text
        reason: String,
    },

    /// The resolver failed with a diagnostic that is not a Python-version conflict
    #[error("Resolver failed during the {phase} phase")]
    ResolverFailed {
        /// Phase in which the failure happened
        phase: ResolutionPhase,
        /// Raw resolver diagnostic, surfaced as-is
        diagnostic: String,
    },

    /// All resolution phases failed
    #[error("Cannot resolve dependencies after trying every phase: {packages}")]
    ResolutionExhausted {
        /// Comma separated list of the packages that conflicted
        packages: String,
    },

    /// A requirement string could not be parsed
    #[error("Invalid requirement '{input}': {reason}")]
    InvalidRequirement {
        /// The offending input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Action log could not be read or written
    #[error("Action log error at {path}: {reason}")]
    ActionLogError {
        /// Path of the action log
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for BootstrapError {
    fn clone(&self) -> Self {
        match self {
            Self::ResolverNotFound {
                program,
            } => Self::ResolverNotFound {
                program: program.clone(),
            },
            Self::ResolverSpawnFailed {
                program,
                reason,
            } => Self::ResolverSpawnFailed {
                program: program.clone(),
                reason: reason.clone(),
            },
            Self::ResolverFailed {
                phase,
                diagnostic,
            } => Self::ResolverFailed {
                phase: *phase,
                diagnostic: diagnostic.clone(),
            },
            Self::ResolutionExhausted {
                packages,
            } => Self::ResolutionExhausted {
                packages: packages.clone(),
            },
            Self::InvalidRequirement {
                input,
                reason,
            } => Self::InvalidRequirement {
                input: input.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ActionLogError {
                path,
                reason,
            } => Self::ActionLogError {
                path: path.clone(),
                reason: reason.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

impl BootstrapError {
    /// Whether this error means the environment itself is unusable, as opposed
    /// to a problem with the requested packages.
    #[must_use]
    pub const fn is_environment_fault(&self) -> bool {
        matches!(self, Self::ResolverNotFound { .. } | Self::ResolverSpawnFailed { .. })
    }
}

/// Error wrapper carrying user-facing details and a suggestion.
///
/// ```rust,no_run
/// use pybootstrap_cli::core::{BootstrapError, ErrorContext};
///
/// let context = ErrorContext::new(BootstrapError::ConfigError {
///     message: "resolver.program is empty".to_string(),
/// })
/// .with_suggestion("Set resolver.program in ~/.pybootstrap/config.toml")
/// .with_details("The resolver program is required to install packages");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BootstrapError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without details or suggestion.
    #[must_use]
    pub const fn new(error: BootstrapError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    ///
    /// Suggestions are displayed in green to draw attention.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    ///
    /// Details are displayed in yellow, below the error line.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colours.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`BootstrapError`] (including one wrapped in an [`ErrorContext`]),
/// [`std::io::Error`] and [`toml::de::Error`]; anything else is shown with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(bootstrap_error) = error.downcast_ref::<BootstrapError>() {
        return create_error_context(bootstrap_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(BootstrapError::IoError(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check file ownership, or run from a directory you can write to")
                .with_details("pybootstrap could not read or write a file it needs");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(BootstrapError::IoError(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(BootstrapError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of ~/.pybootstrap/config.toml (quotes, brackets, tables)");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BootstrapError::Other {
        message,
    })
}

fn create_error_context(error: BootstrapError) -> ErrorContext {
    match &error {
        BootstrapError::ResolverNotFound {
            program,
        } => {
            let suggestion = if program == "uv" {
                "Install uv with 'curl -LsSf https://astral.sh/uv/install.sh | sh' or 'pipx install uv', then re-run the command".to_string()
            } else {
                format!("Install '{program}' or set resolver.program in ~/.pybootstrap/config.toml")
            };
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details("pybootstrap drives an external resolver to install packages and cannot continue without it")
        }

        BootstrapError::ResolverSpawnFailed {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Check that the resolver is executable and that its path in the configuration is correct"),

        BootstrapError::ResolverFailed {
            diagnostic,
            ..
        } => ErrorContext::new(error.clone())
            .with_details(diagnostic.trim().to_string())
            .with_suggestion("This failure is not caused by version constraints. Check package names, network access to the package index, and file permissions"),

        BootstrapError::ResolutionExhausted {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Follow one of the remediation commands printed above"),

        BootstrapError::InvalidRequirement {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Use 'name' or 'name==version', for example 'numpy==2.3.1'"),

        BootstrapError::ConfigError {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Run 'pybootstrap config show' to inspect the effective configuration"),

        BootstrapError::ActionLogError {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Check the action_log path in the configuration, or pass --action-log with a writable path"),

        _ => ErrorContext::new(error),
    }
}
