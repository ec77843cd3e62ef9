//! Structured record of one resolution run.
//!
//! A [`ResolutionLog`] is built by the phase controller as it goes and handed
//! back with the outcome. It serializes to a single JSON object, so runs can
//! be appended to a JSON-lines action log and audited later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::phase::{PhaseState, ResolutionPhase};
use crate::core::BootstrapError;
use crate::version::ConflictVerdict;

/// One resolver invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAttempt {
    pub phase: ResolutionPhase,
    /// Exact requirement strings passed to the resolver
    pub requirements: Vec<String>,
    pub succeeded: bool,
    pub exit_code: i32,
    /// Classification of the failure; `None` when the attempt succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ConflictVerdict>,
    pub finished_at: DateTime<Utc>,
}

/// Every phase attempted during one resolution, plus warnings and the final
/// controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionLog {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub attempts: Vec<PhaseAttempt>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub final_state: PhaseState,
}

impl Default for ResolutionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionLog {
    /// Start a new log with a fresh run id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            attempts: Vec::new(),
            warnings: Vec::new(),
            final_state: PhaseState::INITIAL,
        }
    }

    pub fn record_attempt(&mut self, attempt: PhaseAttempt) {
        self.attempts.push(attempt);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn finish(&mut self, state: PhaseState) {
        self.final_state = state;
    }

    /// Phases in the order they were attempted.
    pub fn phases(&self) -> impl Iterator<Item = ResolutionPhase> + '_ {
        self.attempts.iter().map(|attempt| attempt.phase)
    }

    /// Verdicts of the failed attempts, in order.
    pub fn verdicts(&self) -> impl Iterator<Item = &ConflictVerdict> {
        self.attempts.iter().filter_map(|attempt| attempt.verdict.as_ref())
    }

    /// Append this log as one JSON line to `path`, creating the file and its
    /// parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ActionLogError`] when serialization or any
    /// filesystem operation fails.
    pub async fn append_to(&self, path: &Path) -> Result<(), BootstrapError> {
        let log_error = |reason: String| BootstrapError::ActionLogError {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| log_error(e.to_string()))?;
        }

        let mut line = serde_json::to_string(self).map_err(|e| log_error(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| log_error(e.to_string()))?;
        file.write_all(line.as_bytes()).await.map_err(|e| log_error(e.to_string()))?;
        file.flush().await.map_err(|e| log_error(e.to_string()))?;

        tracing::debug!(target: "resolver", "Appended run {} to {}", self.run_id, path.display());
        Ok(())
    }

    /// Read every run from a JSON-lines action log, skipping blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ActionLogError`] when the file cannot be read
    /// or a line is not a valid log entry.
    pub async fn read_all(path: &Path) -> Result<Vec<Self>, BootstrapError> {
        let content = fs::read_to_string(path).await.map_err(|e| BootstrapError::ActionLogError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| BootstrapError::ActionLogError {
                    path: path.display().to_string(),
                    reason: format!("line {}: {e}", index + 1),
                })
            })
            .collect()
    }
}
