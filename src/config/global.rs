//! Global configuration file (`~/.pybootstrap/config.toml`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::BootstrapError;

fn default_program() -> String {
    "uv".to_string()
}

fn default_args() -> Vec<String> {
    vec!["add".to_string()]
}

fn default_fallback_python() -> String {
    "3.12".to_string()
}

fn is_default_fallback_python(value: &str) -> bool {
    value == default_fallback_python()
}

/// How to run the external resolver.
///
/// ```toml
/// [resolver]
/// program = "uv"
/// args = ["add"]
///
/// [resolver.env]
/// UV_NO_PROGRESS = "1"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Resolver executable, looked up on PATH unless it is a path
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the requirement strings
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Extra environment variables for the resolver process
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            env: HashMap::new(),
        }
    }
}

/// Global configuration for pybootstrap.
///
/// A missing file is not an error: every field has a default.
///
/// # Examples
///
/// ```rust,no_run
/// use pybootstrap_cli::config::GlobalConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = GlobalConfig::load_with_optional(None).await?;
/// println!("Resolver: {} {}", config.resolver.program, config.resolver.args.join(" "));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// JSON-lines file every resolution run is appended to; `~` is expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_log: Option<String>,

    /// Interpreter version suggested when no Python floor could be extracted
    #[serde(default = "default_fallback_python", skip_serializing_if = "is_default_fallback_python")]
    pub fallback_python: String,

    /// External resolver settings
    #[serde(default)]
    pub resolver: ResolverSettings,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            action_log: None,
            fallback_python: default_fallback_python(),
            resolver: ResolverSettings::default(),
        }
    }
}

impl GlobalConfig {
    /// Load from `path`, or from [`default_path`](Self::default_path) when
    /// `None`. A file that does not exist yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// TOML, or fails [`validate`](Self::validate).
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`validate`](Self::validate).
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a specific file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// `~/.pybootstrap/config.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| BootstrapError::ConfigError {
            message: "Unable to determine home directory".to_string(),
        })?;
        Ok(home.join(".pybootstrap").join("config.toml"))
    }

    /// Reject settings the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ConfigError`] for an empty resolver program
    /// or fallback Python version.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.resolver.program.trim().is_empty() {
            return Err(BootstrapError::ConfigError {
                message: "resolver.program must not be empty".to_string(),
            });
        }
        if self.fallback_python.trim().is_empty() {
            return Err(BootstrapError::ConfigError {
                message: "fallback_python must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The action log path with `~` and environment variables expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the path references an undefined variable.
    pub fn action_log_path(&self) -> Result<Option<PathBuf>> {
        self.action_log
            .as_deref()
            .map(crate::utils::platform::resolve_path)
            .transpose()
    }

    /// A commented example written by `pybootstrap config init`.
    #[must_use]
    pub fn init_example() -> Self {
        Self {
            action_log: Some("~/.pybootstrap/actions.jsonl".to_string()),
            fallback_python: default_fallback_python(),
            resolver: ResolverSettings {
                program: default_program(),
                args: default_args(),
                env: HashMap::from([("UV_NO_PROGRESS".to_string(), "1".to_string())]),
            },
        }
    }
}
