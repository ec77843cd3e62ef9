//! `pybootstrap config`: inspect or create the global configuration.
//!
//! ```bash
//! pybootstrap config            # same as `config show`
//! pybootstrap config show
//! pybootstrap config path
//! pybootstrap config init --force
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::GlobalConfig;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Print the effective configuration, defaults included
    Show,

    /// Print the configuration file location
    Path,

    /// Write an example configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    /// Execute the config command with an optional config path.
    ///
    /// # Errors
    ///
    /// Fails when the configuration cannot be read, parsed or written.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Show) | None => Self::show(config_path).await,
            Some(ConfigSubcommands::Path) => Self::show_path(config_path),
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(force, config_path).await,
        }
    }

    fn resolve_path(config_path: Option<PathBuf>) -> Result<PathBuf> {
        match config_path {
            Some(path) => Ok(path),
            None => GlobalConfig::default_path(),
        }
    }

    async fn show(config_path: Option<PathBuf>) -> Result<()> {
        let path = Self::resolve_path(config_path)?;
        let config = GlobalConfig::load_with_optional(Some(path.clone())).await?;

        println!("{}", "Global Configuration".bold());
        if path.exists() {
            println!("Location: {}\n", path.display());
        } else {
            println!("Location: {} (not created, showing defaults)\n", path.display());
        }
        println!("{}", toml::to_string_pretty(&config)?);
        Ok(())
    }

    fn show_path(config_path: Option<PathBuf>) -> Result<()> {
        println!("{}", Self::resolve_path(config_path)?.display());
        Ok(())
    }

    async fn init(force: bool, config_path: Option<PathBuf>) -> Result<()> {
        let path = Self::resolve_path(config_path)?;
        if path.exists() && !force {
            println!("❌ Global config already exists at: {}", path.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        let config = GlobalConfig::init_example();
        config.save_to(&path).await?;

        println!("✅ Created global config at: {}", path.display());
        println!("\n{}", "Example configuration:".bold());
        println!("{}", toml::to_string_pretty(&config)?);
        Ok(())
    }
}
