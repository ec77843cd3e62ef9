//! `pybootstrap classify`: explain captured resolver output.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use super::OutputFormat;
use crate::version::{ConflictVerdict, classify_diagnostic};

/// Classify resolver output read from a file or stdin.
///
/// ```bash
/// uv add numpy==2.3.1 2> err.txt
/// pybootstrap classify err.txt
/// uv add numpy==2.3.1 2>&1 | pybootstrap classify --format json
/// ```
#[derive(Args, Debug)]
pub struct ClassifyCommand {
    /// File containing the resolver's output (stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ClassifyCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Fails only when the input cannot be read; any text classifies.
    pub async fn execute(self) -> Result<()> {
        let text = match &self.file {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read resolver output from {}", path.display()))?,
            None => {
                let mut buffer = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buffer)
                    .await
                    .context("Failed to read resolver output from stdin")?;
                buffer
            }
        };

        let verdict = classify_diagnostic(&text);
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
            OutputFormat::Text => println!("{}", render_text(&verdict)),
        }
        Ok(())
    }
}

fn render_text(verdict: &ConflictVerdict) -> String {
    if !verdict.is_python_version_conflict {
        return format!(
            "{}\nLoosening version constraints will not fix this failure.",
            "Not a Python-version conflict".bold()
        );
    }

    let mut lines = vec![format!("{}", "Python-version conflict".yellow().bold())];
    if verdict.offending_packages.is_empty() {
        lines.push("  (no package could be identified from the output)".to_string());
    }
    lines.extend(verdict.offending_packages.iter().map(|pkg| format!("  {pkg}")));
    lines.push("Retrying with looser version constraints may succeed.".to_string());
    lines.join("\n")
}
