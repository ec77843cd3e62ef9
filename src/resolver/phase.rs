//! Resolution phases and the transition table between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How strictly requirements are rendered for one resolver attempt.
///
/// Phases are totally ordered `Pinned < Ranged < Unconstrained` and the
/// resolution engine only ever moves forward through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPhase {
    /// `name==version`
    Pinned,
    /// `name>=version`
    Ranged,
    /// `name`
    Unconstrained,
}

impl ResolutionPhase {
    /// Every phase, in the order they are attempted.
    pub const ALL: [Self; 3] = [Self::Pinned, Self::Ranged, Self::Unconstrained];

    /// The next looser phase, or `None` after `Unconstrained`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pinned => Some(Self::Ranged),
            Self::Ranged => Some(Self::Unconstrained),
            Self::Unconstrained => None,
        }
    }

    /// Zero-based position in [`ALL`](Self::ALL).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pinned => "pinned",
            Self::Ranged => "ranged",
            Self::Unconstrained => "unconstrained",
        };
        f.write_str(name)
    }
}

/// State of the phase controller.
///
/// `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "phase", rename_all = "snake_case")]
pub enum PhaseState {
    /// About to invoke, or invoking, the resolver at this phase
    Attempting(ResolutionPhase),
    /// The resolver succeeded at this phase
    Succeeded(ResolutionPhase),
    /// Resolution stopped without success
    Failed,
}

impl PhaseState {
    /// The initial state of every resolution.
    pub const INITIAL: Self = Self::Attempting(ResolutionPhase::Pinned);

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Attempting(_))
    }
}

/// What the controller does after one resolver attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The attempt succeeded; stop with success
    Succeed,
    /// Python-version conflict; retry at the given looser phase
    Advance(ResolutionPhase),
    /// A failure loosening versions cannot fix; stop immediately
    Abort,
    /// The last phase failed; stop and produce guidance
    Exhaust,
}

impl Transition {
    /// The transition table.
    ///
    /// | Phase | Succeeded | Version conflict | Transition |
    /// |---|---|---|---|
    /// | any | yes | - | `Succeed` |
    /// | `Pinned` / `Ranged` | no | yes | `Advance(next)` |
    /// | `Pinned` / `Ranged` | no | no | `Abort` |
    /// | `Unconstrained` | no | any | `Exhaust` |
    ///
    /// ```rust
    /// use pybootstrap_cli::resolver::{ResolutionPhase, Transition};
    ///
    /// assert_eq!(
    ///     Transition::from_attempt(ResolutionPhase::Pinned, false, true),
    ///     Transition::Advance(ResolutionPhase::Ranged)
    /// );
    /// assert_eq!(
    ///     Transition::from_attempt(ResolutionPhase::Unconstrained, false, false),
    ///     Transition::Exhaust
    /// );
    /// ```
    #[must_use]
    pub const fn from_attempt(phase: ResolutionPhase, succeeded: bool, is_version_conflict: bool) -> Self {
        if succeeded {
            return Self::Succeed;
        }
        match phase.next() {
            None => Self::Exhaust,
            Some(next) if is_version_conflict => Self::Advance(next),
            Some(_) => Self::Abort,
        }
    }

    /// The controller state this transition leads to.
    #[must_use]
    pub const fn next_state(self, phase: ResolutionPhase) -> PhaseState {
        match self {
            Self::Succeed => PhaseState::Succeeded(phase),
            Self::Advance(next) => PhaseState::Attempting(next),
            Self::Abort | Self::Exhaust => PhaseState::Failed,
        }
    }
}
