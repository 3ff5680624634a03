//! Results sync engine — materializes ledger tallies into the local cache.

use std::sync::Arc;

use evote_chain::ChainRpc;
use evote_store::{ElectionStore, ResultRecord, ResultStore};
use evote_types::{Clock, ElectionStatus};

use crate::EngineError;

/// Outcome of one sync.
#[derive(Debug, PartialEq, Eq)]
pub struct SyncReport {
    /// Cached rows after the sync (one per candidate).
    pub synced: usize,
    /// Whether the ledger reports the election finalized.
    pub finalized: bool,
}

pub struct ResultsSync<S, C, K> {
    store: Arc<S>,
    chain: Arc<C>,
    clock: Arc<K>,
}

impl<S, C, K> ResultsSync<S, C, K>
where
    S: ElectionStore + ResultStore,
    C: ChainRpc,
    K: Clock,
{
    pub fn new(store: Arc<S>, chain: Arc<C>, clock: Arc<K>) -> Self {
        Self {
            store,
            chain,
            clock,
        }
    }

    /// Pull tallies from the ledger and replace the cached snapshot.
    ///
    /// Both ledger reads happen before any deletion, so a fetch failure
    /// leaves the previous snapshot intact (fail before destroy). Every
    /// candidate holding the maximum vote count is marked a winner; ties
    /// produce multiple winners. If the ledger reports the election
    /// finalized, local status advances to `finalized`.
    pub async fn sync(&self, election_id: u64) -> Result<SyncReport, EngineError> {
        let mut record = self
            .store
            .get_election(election_id)
            .map_err(|e| EngineError::from_lookup(e, format!("election {election_id}")))?;
        let ballot = record
            .ballot_address
            .clone()
            .ok_or(EngineError::NotDeployed(election_id))?;

        let tallies = self.chain.get_ballot_results(&ballot).await?;
        let info = self.chain.get_election_info(&ballot).await?;

        let max_votes = tallies.iter().map(|t| t.vote_count).max().unwrap_or(0);
        let synced_at = self.clock.now();
        let rows: Vec<ResultRecord> = tallies
            .iter()
            .map(|t| ResultRecord {
                election_id,
                candidate_id: t.id,
                candidate_name: t.name.clone(),
                party: t.party.clone(),
                vote_count: t.vote_count,
                total_commits: info.total_commits,
                total_reveals: info.total_reveals,
                is_winner: t.vote_count == max_votes && max_votes > 0,
                synced_at,
            })
            .collect();

        self.store.replace_results(election_id, &rows)?;

        if info.is_finalized && record.status.can_advance_to(ElectionStatus::Finalized) {
            record.status = ElectionStatus::Finalized;
            record.updated_at = synced_at;
            self.store.update_election(&record)?;
        }

        tracing::info!(
            election_id,
            synced = rows.len(),
            finalized = info.is_finalized,
            "results synced from ledger"
        );

        Ok(SyncReport {
            synced: rows.len(),
            finalized: info.is_finalized,
        })
    }
}
