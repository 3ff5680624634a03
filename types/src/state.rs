//! State enums for elections and vote receipts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an election.
///
/// Status only advances forward through the variant order, except for the
/// explicit `Cancelled` exit, which is reachable from any non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    /// Local record exists; ledger deployment has not (yet) succeeded.
    Pending,
    /// Ballot contract deployed; commit phase open.
    Active,
    /// Commit deadline passed; reveal phase open.
    Reveal,
    /// Reveal deadline passed; tally in progress on the ledger.
    Tallying,
    /// Ledger reports the tally as final.
    Finalized,
    /// Explicitly cancelled; terminal.
    Cancelled,
}

impl ElectionStatus {
    /// Whether no further transitions are allowed out of this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Cancelled)
    }

    /// Whether a transition to `next` is legal: strictly forward, or the
    /// cancellation exit from any non-terminal state.
    pub fn can_advance_to(&self, next: ElectionStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Cancelled {
            return true;
        }
        next > *self
    }

    /// Whether vote commits may still be recorded against this election.
    pub fn accepts_commits(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Reveal => "reveal",
            Self::Tallying => "tallying",
            Self::Finalized => "finalized",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Phase of a vote receipt. Strictly monotonic: a revealed receipt never
/// reverts to committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotePhase {
    Committed,
    Revealed,
}

impl VotePhase {
    pub fn is_revealed(&self) -> bool {
        matches!(self, Self::Revealed)
    }
}

/// Kind of election, as encoded in the ballot deployment call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionType {
    General,
    Constituency,
}

impl ElectionType {
    /// Wire code used by the deploy-election ledger call.
    pub fn code(&self) -> u8 {
        match self {
            Self::General => 0,
            Self::Constituency => 1,
        }
    }
}

impl Default for ElectionType {
    fn default() -> Self {
        Self::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_advances_forward_only() {
        assert!(ElectionStatus::Pending.can_advance_to(ElectionStatus::Active));
        assert!(ElectionStatus::Active.can_advance_to(ElectionStatus::Finalized));
        assert!(!ElectionStatus::Active.can_advance_to(ElectionStatus::Pending));
        assert!(!ElectionStatus::Reveal.can_advance_to(ElectionStatus::Active));
    }

    #[test]
    fn cancel_reachable_from_any_non_terminal_state() {
        for s in [
            ElectionStatus::Pending,
            ElectionStatus::Active,
            ElectionStatus::Reveal,
            ElectionStatus::Tallying,
        ] {
            assert!(s.can_advance_to(ElectionStatus::Cancelled), "{s} should be cancellable");
        }
    }

    #[test]
    fn terminal_states_admit_nothing() {
        assert!(!ElectionStatus::Finalized.can_advance_to(ElectionStatus::Cancelled));
        assert!(!ElectionStatus::Cancelled.can_advance_to(ElectionStatus::Finalized));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ElectionStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn election_type_codes() {
        assert_eq!(ElectionType::General.code(), 0);
        assert_eq!(ElectionType::Constituency.code(), 1);
    }
}
