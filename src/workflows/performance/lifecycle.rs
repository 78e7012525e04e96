use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle states for a performance improvement plan.
///
/// `closed` is the manual administrative exit while `completed` marks a plan
/// that met its improvement bar; both are terminal and deliberately distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipState {
    Proposed,
    Active,
    Extended,
    Closed,
    OffboardingDraft,
    Terminated,
    Hold,
    Completed,
}

impl PipState {
    pub const ALL: [Self; 8] = [
        Self::Proposed,
        Self::Active,
        Self::Extended,
        Self::Closed,
        Self::OffboardingDraft,
        Self::Terminated,
        Self::Hold,
        Self::Completed,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Active => "active",
            Self::Extended => "extended",
            Self::Closed => "closed",
            Self::OffboardingDraft => "offboarding_draft",
            Self::Terminated => "terminated",
            Self::Hold => "hold",
            Self::Completed => "completed",
        }
    }

    /// States a plan may legally move to from `self`.
    pub const fn successors(self) -> &'static [PipState] {
        match self {
            Self::Proposed => &[Self::Active, Self::Closed],
            Self::Active => &[
                Self::Extended,
                Self::Closed,
                Self::OffboardingDraft,
                Self::Terminated,
                Self::Completed,
            ],
            Self::Extended => &[
                Self::Closed,
                Self::OffboardingDraft,
                Self::Terminated,
                Self::Completed,
            ],
            Self::OffboardingDraft => &[Self::Terminated, Self::Hold],
            Self::Closed | Self::Terminated | Self::Hold | Self::Completed => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for PipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected state change, surfaced to callers as a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal transition {from} -> {to}")]
pub struct TransitionError {
    pub from: PipState,
    pub to: PipState,
}

/// Validate a requested state change. No side effects; must be called before
/// any persisted status mutation on a plan or on the termination workflow.
pub fn assert_transition(from: PipState, to: PipState) -> Result<(), TransitionError> {
    if from.successors().contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}
