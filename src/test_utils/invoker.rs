//! In-memory resolver for driving the phase controller in tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::BootstrapError;
use crate::invoker::{ResolverInvocationResult, ResolverInvoker};

/// Replays queued results in order and records the requirement strings of
/// every call.
///
/// Running out of queued results is reported as [`BootstrapError::Other`], so
/// a test that expects fewer invocations fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<Result<ResolverInvocationResult, BootstrapError>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedInvoker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary result.
    #[must_use]
    pub fn then(self, response: Result<ResolverInvocationResult, BootstrapError>) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Queue a successful invocation.
    #[must_use]
    pub fn then_succeed(self) -> Self {
        self.then(Ok(ResolverInvocationResult {
            succeeded: true,
            exit_code: 0,
            stdout: "Resolved packages".to_string(),
            stderr: String::new(),
        }))
    }

    /// Queue a failed invocation reporting `stderr`.
    #[must_use]
    pub fn then_fail(self, stderr: &str) -> Self {
        self.then(Ok(ResolverInvocationResult {
            succeeded: false,
            exit_code: 1,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }))
    }

    /// Queue an environment fault.
    #[must_use]
    pub fn then_error(self, error: BootstrapError) -> Self {
        self.then(Err(error))
    }

    /// Requirement strings of every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Results still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

impl ResolverInvoker for ScriptedInvoker {
    async fn invoke(&self, requirements: &[String]) -> Result<ResolverInvocationResult, BootstrapError> {
        lock(&self.calls).push(requirements.to_vec());
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(BootstrapError::Other {
                message: format!("ScriptedInvoker has no response queued for {requirements:?}"),
            })
        })
    }
}
