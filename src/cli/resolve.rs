//! `pybootstrap resolve`: run the progressive resolution engine.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::GlobalConfig;
use crate::invoker::CommandInvoker;
use crate::models::{PackageRequirement, parse_requirement_lines};
use crate::resolver::{GuidanceGenerator, ProgressiveResolver, Resolution, ResolutionOutcome};

/// Install packages through the configured resolver.
///
/// ```bash
/// pybootstrap resolve numpy==2.3.1 rich
/// pybootstrap resolve -r requirements.txt --project-dir ./app
/// pybootstrap resolve pandas==2.0.0 --format json
/// ```
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Packages as `name` or `name==version`
    #[arg(value_name = "PKG")]
    packages: Vec<String>,

    /// Read packages from a requirements-style file (repeatable)
    #[arg(short = 'r', long = "requirements", value_name = "FILE")]
    requirement_files: Vec<PathBuf>,

    /// Run the resolver inside this project directory
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// Resolver program, overriding `resolver.program`
    #[arg(long, value_name = "PROG")]
    program: Option<String>,

    /// Append the resolution log to this JSON-lines file, overriding `action_log`
    #[arg(long, value_name = "PATH")]
    action_log: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ResolveCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails on invalid arguments, unreadable files, a missing resolver, and
    /// whenever resolution does not succeed.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let mut config = GlobalConfig::load_with_optional(config_path).await?;
        if let Some(program) = &self.program {
            config.resolver.program.clone_from(program);
        }

        let requirements = self.collect_requirements().await?;

        let mut invoker = CommandInvoker::from_settings(&config.resolver);
        if let Some(dir) = &self.project_dir {
            invoker = invoker.with_working_dir(dir);
        }
        let resolver = ProgressiveResolver::new(invoker).with_guidance(GuidanceGenerator::from_config(&config));

        let resolution = resolver.resolve(&requirements).await?;

        let action_log = match &self.action_log {
            Some(path) => Some(path.clone()),
            None => config.action_log_path()?,
        };
        if let Some(path) = action_log {
            if let Err(e) = resolution.log.append_to(&path).await {
                tracing::warn!("Could not write action log: {}", e);
            }
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            }
            OutputFormat::Text => print_text(&resolution),
        }

        match resolution.outcome.to_error() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    async fn collect_requirements(&self) -> Result<Vec<PackageRequirement>> {
        let mut requirements = self
            .packages
            .iter()
            .map(|spec| PackageRequirement::parse(spec))
            .collect::<Result<Vec<_>, _>>()?;

        for file in &self.requirement_files {
            let content = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("Failed to read requirements from {}", file.display()))?;
            requirements.extend(parse_requirement_lines(&content));
        }
        Ok(requirements)
    }
}

fn print_text(resolution: &Resolution) {
    match &resolution.outcome {
        ResolutionOutcome::Success {
            phase,
            requirements,
        } => {
            if requirements.is_empty() {
                println!("Nothing to resolve");
                return;
            }
            println!("✅ Resolved {} package(s) at the {} phase", requirements.len(), phase);
            for requirement in requirements {
                println!("  {requirement}");
            }
            for warning in &resolution.log.warnings {
                println!("\n{} {}", "⚠️  Warning:".yellow().bold(), warning.yellow());
            }
        }
        ResolutionOutcome::ExhaustedAllPhases {
            guidance,
            ..
        } => {
            println!("{guidance}");
        }
        // The diagnostic is shown by the error display
        ResolutionOutcome::NonRetryableFailure {
            ..
        } => {}
    }
}
