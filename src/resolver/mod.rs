//! Progressive dependency resolution.
//!
//! The [`ProgressiveResolver`] drives an external resolver through up to three
//! attempts of decreasing strictness:
//!
//! 1. **Pinned** - `name==version` for every package with a known version.
//!    The common case succeeds here with no change in behavior.
//! 2. **Ranged** - `name>=version`. Keeps a floor version while unblocking
//!    interpreter-version conflicts.
//! 3. **Unconstrained** - bare names. Success here is reported with a warning,
//!    because nothing about the installed versions is reproducible.
//!
//! After each failed attempt the diagnostic is classified
//! ([`classify`](crate::version::classify)). Only a Python-version conflict
//! advances to the next phase; any other failure (unknown package, network
//! outage, permissions) ends the run immediately with the raw diagnostic.
//! When the last phase fails too, the [`GuidanceGenerator`] turns the
//! accumulated verdicts into a remediation report.
//!
//! # State machine
//!
//! ```text
//!  Attempting(Pinned) --conflict--> Attempting(Ranged) --conflict--> Attempting(Unconstrained)
//!        |    \                           |    \                           |    \
//!     success  other failure           success  other failure          success  any failure
//!        v        v                       v        v                       v        v
//!   Succeeded   Failed               Succeeded   Failed               Succeeded   Failed (+ guidance)
//! ```
//!
//! The table itself lives in [`Transition::from_attempt`]. Phases only ever
//! move forward, and each run produces exactly one [`ResolutionOutcome`].
//!
//! Packages without a known exact version render as bare names in every
//! phase. When no package has one, a conflict re-runs the resolver with the
//! same list at each phase, and the log shows identical attempts.
//!
//! # Observability
//!
//! Every attempt is recorded in the returned [`ResolutionLog`] (phase, exact
//! requirement strings, exit code, verdict) and narrated through `tracing`
//! under the `resolver` target.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pybootstrap_cli::invoker::CommandInvoker;
//! use pybootstrap_cli::models::PackageRequirement;
//! use pybootstrap_cli::resolver::{ProgressiveResolver, ResolutionOutcome};
//!
//! # async fn example() -> Result<(), pybootstrap_cli::core::BootstrapError> {
//! let resolver = ProgressiveResolver::new(CommandInvoker::new("uv", ["add"]));
//! let resolution = resolver
//!     .resolve(&[PackageRequirement::new("numpy", Some("2.3.1"))])
//!     .await?;
//!
//! match &resolution.outcome {
//!     ResolutionOutcome::Success { phase, requirements } => {
//!         println!("Installed at {phase}: {}", requirements.join(" "));
//!     }
//!     ResolutionOutcome::NonRetryableFailure { diagnostic, .. } => eprintln!("{diagnostic}"),
//!     ResolutionOutcome::ExhaustedAllPhases { guidance, .. } => eprintln!("{guidance}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod guidance;
pub mod log;
pub mod phase;


pub use guidance::GuidanceGenerator;
pub use log::{PhaseAttempt, ResolutionLog};
pub use phase::{PhaseState, ResolutionPhase, Transition};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::BootstrapError;
use crate::invoker::ResolverInvoker;
use crate::models::PackageRequirement;
use crate::version::{ConflictVerdict, classify, format_all};

/// The single result of one resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// The resolver accepted the requirements.
    Success {
        phase: ResolutionPhase,
        /// The requirement strings that were installed
        requirements: Vec<String>,
    },
    /// Every phase failed; `verdicts` holds one entry per phase, in order.
    ExhaustedAllPhases {
        verdicts: Vec<ConflictVerdict>,
        /// Multi-line remediation report
        guidance: String,
    },
    /// The resolver failed for a reason loosening versions cannot fix.
    NonRetryableFailure {
        phase: ResolutionPhase,
        /// Raw resolver diagnostic, unmodified
        diagnostic: String,
    },
}

impl ResolutionOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure as a [`BootstrapError`], or `None` on success.
    #[must_use]
    pub fn to_error(&self) -> Option<BootstrapError> {
        match self {
            Self::Success { .. } => None,
            Self::NonRetryableFailure {
                phase,
                diagnostic,
            } => Some(BootstrapError::ResolverFailed {
                phase: *phase,
                diagnostic: diagnostic.clone(),
            }),
            Self::ExhaustedAllPhases {
                verdicts,
                ..
            } => {
                let names: Vec<String> = GuidanceGenerator::offending_packages(verdicts)
                    .iter()
                    .map(|pkg| pkg.name.clone())
                    .collect();
                let packages = if names.is_empty() {
                    "no conflicting package could be identified".to_string()
                } else {
                    names.join(", ")
                };
                Some(BootstrapError::ResolutionExhausted {
                    packages,
                })
            }
        }
    }
}

/// Outcome plus the record of how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub outcome: ResolutionOutcome,
    pub log: ResolutionLog,
}

/// Drives a [`ResolverInvoker`] through the pinned, ranged and unconstrained
/// phases.
///
/// Attempts are strictly sequential: each phase awaits the previous one's
/// classified result before starting.
#[derive(Debug, Clone)]
pub struct ProgressiveResolver<I> {
    invoker: I,
    guidance: GuidanceGenerator,
}

impl<I: ResolverInvoker> ProgressiveResolver<I> {
    /// Create a resolver with the default guidance settings (`uv add`).
    pub fn new(invoker: I) -> Self {
        Self {
            invoker,
            guidance: GuidanceGenerator::default(),
        }
    }

    /// Use a custom guidance generator for exhaustion reports.
    #[must_use]
    pub fn with_guidance(mut self, guidance: GuidanceGenerator) -> Self {
        self.guidance = guidance;
        self
    }

    pub const fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Resolve `requirements`, loosening constraints on Python-version
    /// conflicts.
    ///
    /// Duplicate packages (by normalized name) are collapsed, the first entry
    /// wins. An empty list succeeds at the pinned phase without invoking the
    /// resolver.
    ///
    /// # Errors
    ///
    /// Returns an error only for environment faults raised by the invoker,
    /// such as [`BootstrapError::ResolverNotFound`]. Every resolver failure is
    /// reported through [`ResolutionOutcome`].
    pub async fn resolve(&self, requirements: &[PackageRequirement]) -> Result<Resolution, BootstrapError> {
        let requirements = dedupe(requirements);
        let mut log = ResolutionLog::new();

        if requirements.is_empty() {
            tracing::info!(target: "resolver", "No packages to resolve");
            log.finish(PhaseState::Succeeded(ResolutionPhase::Pinned));
            return Ok(Resolution {
                outcome: ResolutionOutcome::Success {
                    phase: ResolutionPhase::Pinned,
                    requirements: Vec::new(),
                },
                log,
            });
        }

        let mut phase = ResolutionPhase::Pinned;
        let mut verdicts: Vec<ConflictVerdict> = Vec::with_capacity(ResolutionPhase::ALL.len());

        loop {
            let strings = format_all(&requirements, phase);
            tracing::info!(
                target: "resolver",
                "Resolving {} package(s) at {} phase: {}",
                strings.len(),
                phase,
                strings.join(" ")
            );

            if log.attempts.last().is_some_and(|previous| previous.requirements == strings) {
                tracing::debug!(
                    target: "resolver",
                    "No exact versions to loosen; {} phase repeats the previous requirement list",
                    phase
                );
            }

            let result = self.invoker.invoke(&strings).await?;
            let verdict = (!result.succeeded).then(|| classify(&result));
            let is_version_conflict = verdict.as_ref().is_some_and(|v| v.is_python_version_conflict);
            let transition = Transition::from_attempt(phase, result.succeeded, is_version_conflict);

            log.record_attempt(PhaseAttempt {
                phase,
                requirements: strings.clone(),
                succeeded: result.succeeded,
                exit_code: result.exit_code,
                verdict: verdict.clone(),
                finished_at: Utc::now(),
            });
            log.finish(transition.next_state(phase));

            match transition {
                Transition::Succeed => {
                    if phase == ResolutionPhase::Unconstrained {
                        let warning = format!(
                            "Packages were installed without any version constraints, so this environment is not reproducible. \
                             Lock it now: run `{} lock` and commit the lock file.",
                            self.guidance.program()
                        );
                        tracing::warn!(target: "resolver", "{}", warning);
                        log.warn(warning);
                    } else {
                        tracing::info!(target: "resolver", "Resolved at {} phase", phase);
                    }
                    return Ok(Resolution {
                        outcome: ResolutionOutcome::Success {
                            phase,
                            requirements: strings,
                        },
                        log,
                    });
                }
                Transition::Advance(next) => {
                    if let Some(verdict) = &verdict {
                        tracing::info!(
                            target: "resolver",
                            "{} at {} phase, retrying with {} constraints",
                            verdict.summary(),
                            phase,
                            next
                        );
                    }
                    verdicts.extend(verdict);
                    phase = next;
                }
                Transition::Abort => {
                    tracing::warn!(
                        target: "resolver",
                        "Resolver failed at {} phase (exit code {}) with an error that looser versions cannot fix",
                        phase,
                        result.exit_code
                    );
                    return Ok(Resolution {
                        outcome: ResolutionOutcome::NonRetryableFailure {
                            phase,
                            diagnostic: result.diagnostic().to_string(),
                        },
                        log,
                    });
                }
                Transition::Exhaust => {
                    verdicts.extend(verdict);
                    tracing::error!(target: "resolver", "Dependency resolution failed in every phase");
                    let guidance = self.guidance.generate(&verdicts, &requirements);
                    return Ok(Resolution {
                        outcome: ResolutionOutcome::ExhaustedAllPhases {
                            verdicts,
                            guidance,
                        },
                        log,
                    });
                }
            }
        }
    }
}

/// Collapse entries naming the same package, keeping the first.
fn dedupe(requirements: &[PackageRequirement]) -> Vec<PackageRequirement> {
    let mut seen = HashSet::new();
    requirements
        .iter()
        .filter(|req| {
            let fresh = seen.insert(req.normalized_name());
            if !fresh {
                tracing::debug!(target: "resolver", "Ignoring duplicate requirement '{}'", req);
            }
            fresh
        })
        .cloned()
        .collect()
}
