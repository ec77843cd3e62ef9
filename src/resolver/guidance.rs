//! Remediation report for a resolution that failed in every phase.
//!
//! The report names every offending package, summarizes each phase's verdict
//! (quoting the raw diagnostic whenever no package could be extracted from
//! it), and lists remediation options as literal commands that can be copied
//! into a shell.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::Write as _;

use super::phase::ResolutionPhase;
use crate::config::GlobalConfig;
use crate::models::PackageRequirement;
use crate::version::{ConflictVerdict, OffendingPackage, format_requirement};

const NO_DIAGNOSTIC: &str = "(resolver produced no diagnostic output)";

/// Builds the exhaustion report.
#[derive(Debug, Clone)]
pub struct GuidanceGenerator {
    program: String,
    install_args: Vec<String>,
    fallback_python: String,
}

impl Default for GuidanceGenerator {
    fn default() -> Self {
        Self::from_config(&GlobalConfig::default())
    }
}

impl GuidanceGenerator {
    /// Commands are rendered as `<program> <install_args...> <packages...>`.
    pub fn new<I, S>(program: impl Into<String>, install_args: I, fallback_python: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            install_args: install_args.into_iter().map(Into::into).collect(),
            fallback_python: fallback_python.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self::new(
            config.resolver.program.clone(),
            config.resolver.args.clone(),
            config.fallback_python.clone(),
        )
    }

    /// The resolver program used in rendered commands.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Distinct offending packages across all verdicts, first appearance wins.
    #[must_use]
    pub fn offending_packages(verdicts: &[ConflictVerdict]) -> Vec<&OffendingPackage> {
        let mut seen = HashSet::new();
        verdicts
            .iter()
            .flat_map(|verdict| verdict.offending_packages.iter())
            .filter(|pkg| seen.insert(pkg.name.as_str()))
            .collect()
    }

    /// The interpreter version to suggest: the highest Python floor named by
    /// any verdict, or the configured fallback.
    #[must_use]
    pub fn suggested_python(&self, verdicts: &[ConflictVerdict]) -> String {
        verdicts
            .iter()
            .flat_map(|verdict| verdict.offending_packages.iter())
            .filter_map(OffendingPackage::python_floor)
            .filter(|floor| floor.chars().all(|c| c.is_ascii_digit() || c == '.') && !floor.is_empty())
            .max_by(|a, b| compare_release(a, b))
            .map_or_else(|| self.fallback_python.clone(), str::to_string)
    }

    /// Produce the multi-line report.
    ///
    /// `verdicts` are in phase order (pinned, ranged, unconstrained).
    #[must_use]
    pub fn generate(&self, verdicts: &[ConflictVerdict], discovered: &[PackageRequirement]) -> String {
        let offending = Self::offending_packages(verdicts);
        let offending_names: HashSet<&str> = offending.iter().map(|pkg| pkg.name.as_str()).collect();
        let python = self.suggested_python(verdicts);

        let mut report = String::new();
        let _ = writeln!(report, "Dependency resolution failed in every phase (pinned, ranged, unconstrained).");

        report.push_str("\nConflicting packages:\n");
        if offending.is_empty() {
            report.push_str("  (no package could be identified from the resolver output; see the phase diagnostics below)\n");
        }
        for pkg in &offending {
            let _ = writeln!(report, "  - {} ({pkg})", pkg.name);
        }

        report.push_str("\nPhase results:\n");
        for (index, verdict) in verdicts.iter().enumerate() {
            let label = ResolutionPhase::ALL
                .get(index)
                .map_or_else(|| format!("attempt {}", index + 1), ToString::to_string);
            let _ = writeln!(report, "  {label}: {}", verdict.summary());
            if verdict.offending_packages.is_empty() {
                quote_diagnostic(&mut report, &verdict.diagnostic);
            }
        }

        report.push_str("\nRemediation options (run one):\n");
        let mut option = 0;
        let mut push_option = |report: &mut String, title: &str, command: String| {
            option += 1;
            let _ = writeln!(report, "  {option}. {title}\n       {command}");
        };

        push_option(
            &mut report,
            &format!("Use a Python interpreter that satisfies every package (Python {python}):"),
            format!(
                "{program} python install {python} && {program} python pin {python}",
                program = self.program
            ),
        );
        push_option(
            &mut report,
            &format!("Raise the project's minimum Python version to {python}:"),
            format!(
                "sed -i.bak 's/^requires-python = .*/requires-python = \">={python}\"/' pyproject.toml"
            ),
        );
        push_option(
            &mut report,
            "Install versions compatible with the current interpreter:",
            self.compatible_versions_command(&offending, discovered),
        );

        let remaining: Vec<String> = discovered
            .iter()
            .filter(|req| !offending_names.contains(req.normalized_name().as_str()))
            .map(|req| format_requirement(req, ResolutionPhase::Unconstrained))
            .collect();
        if !offending.is_empty() && !remaining.is_empty() {
            push_option(
                &mut report,
                "Install the other packages now and add the conflicting ones later:",
                self.install_command(remaining.iter().map(String::as_str)),
            );
        }

        report
    }

    /// Cap each offending package below the version the resolver blamed; fall
    /// back to lowest-direct resolution when no version is known.
    fn compatible_versions_command(
        &self,
        offending: &[&OffendingPackage],
        discovered: &[PackageRequirement],
    ) -> String {
        let capped: Vec<String> = offending
            .iter()
            .filter_map(|pkg| pkg.version().map(|version| format!("{}<{version}", pkg.name)))
            .collect();
        if !offending.is_empty() && capped.len() == offending.len() {
            return self.install_command(capped.iter().map(String::as_str));
        }

        let names: Vec<String> = if offending.is_empty() {
            discovered.iter().map(|req| format_requirement(req, ResolutionPhase::Unconstrained)).collect()
        } else {
            offending.iter().map(|pkg| pkg.name.clone()).collect()
        };
        self.install_command(
            ["--resolution", "lowest-direct"].into_iter().chain(names.iter().map(String::as_str)),
        )
    }

    fn install_command<'a>(&'a self, extra: impl IntoIterator<Item = &'a str>) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.install_args.iter().map(String::as_str))
            .chain(extra)
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_diagnostic(report: &mut String, diagnostic: &str) {
    if diagnostic.trim().is_empty() {
        let _ = writeln!(report, "      {NO_DIAGNOSTIC}");
        return;
    }
    for line in diagnostic.trim_end().lines() {
        let _ = writeln!(report, "      | {line}");
    }
}

/// Quote `word` for a POSIX shell when it contains anything but safe characters.
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word.chars().all(|c| c.is_ascii_alphanumeric() || "-_.=/+:,@%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Compare dotted release numbers numerically (`3.10` > `3.9`).
fn compare_release(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> { v.split('.').map(|part| part.parse().unwrap_or(0)).collect() };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0).cmp(&b.get(i).copied().unwrap_or(0)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
