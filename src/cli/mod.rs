//! Command-line interface for pybootstrap.
//!
//! # Available Commands
//!
//! - `resolve` - Install packages, loosening version constraints on Python-version conflicts
//! - `classify` - Classify captured resolver output without running anything
//! - `config` - Inspect or create the global configuration
//!
//! # Examples
//!
//! ```bash
//! # Resolve packages given on the command line
//! pybootstrap resolve numpy==2.3.1 pandas==2.0.0
//!
//! # Resolve a requirements file inside a project, appending to the action log
//! pybootstrap resolve -r requirements.txt --project-dir ./app --action-log ./actions.jsonl
//!
//! # Explain a failure captured from an earlier `uv add`
//! uv add numpy==2.3.1 2> err.txt; pybootstrap classify err.txt
//! ```
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--config` / `-c`: alternative global configuration file
//!
//! `RUST_LOG` overrides the level chosen by `--verbose` and `--quiet`.

mod classify;
mod config;
mod resolve;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use classify::ClassifyCommand;
pub use config::ConfigCommand;
pub use resolve::ResolveCommand;

/// Output format for commands that print results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Settings derived from global flags, separate from parsing so tests can
/// inject them.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set (`"debug"`, `"info"`, `"error"`)
    pub log_level: Option<String>,

    /// Custom path to the global configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr tracing subscriber.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("info"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

/// Top-level command line.
#[derive(Parser)]
#[command(
    name = "pybootstrap",
    about = "Bootstrap Python project environments with progressive dependency resolution",
    version,
    long_about = "pybootstrap installs a project's packages through an external resolver (uv by default). \
                  When the pinned versions conflict with the interpreter it retries with minimum versions, \
                  then with bare names, and prints copy-pasteable remediation commands if every attempt fails."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output, including every resolver invocation.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file (default: ~/.pybootstrap/config.toml).
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install packages with pinned, then ranged, then unconstrained requirements
    Resolve(ResolveCommand),

    /// Classify captured resolver output
    Classify(ClassifyCommand),

    /// Inspect or create the global configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Execute the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` turns it into a user-friendly
    /// message and a non-zero exit status.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    /// Execute with an injected [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(config.config_path).await,
            Commands::Classify(cmd) => cmd.execute().await,
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
        }
    }
}
