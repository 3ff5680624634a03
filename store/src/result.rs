//! Cached election result storage trait.

use serde::{Deserialize, Serialize};

use evote_types::Timestamp;

use crate::StoreError;

/// One candidate's cached tally row, materialized from the ledger by a sync.
///
/// Ephemeral derived data: the ledger is the source of truth, and the whole
/// set for an election is replaced on every successful sync.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRecord {
    pub election_id: u64,
    pub candidate_id: u64,
    pub candidate_name: String,
    pub party: String,
    pub vote_count: u64,
    pub total_commits: u64,
    pub total_reveals: u64,
    pub is_winner: bool,
    pub synced_at: Timestamp,
}

/// Trait for cached result storage.
pub trait ResultStore {
    /// Replace the cached rows for an election with `rows`, atomically:
    /// the old set is deleted and the new set inserted in one write, so a
    /// failure can never leave a half-replaced cache.
    fn replace_results(&self, election_id: u64, rows: &[ResultRecord])
        -> Result<(), StoreError>;

    fn results_for(&self, election_id: u64) -> Result<Vec<ResultRecord>, StoreError>;
}
