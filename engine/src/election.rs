//! Election lifecycle coordinator.
//!
//! Creation is local-first: the durable record (and its candidates) exists
//! before ledger deployment is attempted, and a failed deployment degrades
//! the operation to a reported partial success instead of rolling back.
//! Cancellation is the opposite — ledger-first, all or nothing — because no
//! compensating local state is safe to apply without the ledger's
//! confirmation.

use std::sync::Arc;

use evote_chain::{ChainRpc, DeployElection, ElectionInfo, IntegrityReport};
use evote_store::{CandidateRecord, ElectionRecord, ElectionStore, ResultRecord, ResultStore};
use evote_types::{Clock, ElectionStatus, ElectionType, Timestamp, WalletAddress};

use crate::EngineError;

/// Input for creating an election.
#[derive(Clone, Debug)]
pub struct NewElection {
    pub name: String,
    pub description: String,
    pub election_type: ElectionType,
    pub constituency_id: u32,
    pub commit_deadline: Timestamp,
    pub reveal_deadline: Timestamp,
    pub candidates: Vec<NewCandidate>,
    pub created_by: WalletAddress,
}

#[derive(Clone, Debug)]
pub struct NewCandidate {
    pub name: String,
    pub party: String,
    pub description: String,
}

/// Result of `create_election`: the local half always succeeded; `deployed`
/// says whether the ledger half did too. On a failed deployment the record
/// stays `pending` with no ledger identifiers and `chain_error` carries the
/// remote error text for the caller to decide on a retry.
#[derive(Debug)]
pub struct CreationOutcome {
    pub election: ElectionRecord,
    pub candidates: Vec<CandidateRecord>,
    pub deployed: bool,
    pub chain_error: Option<String>,
}

/// A local election enriched with live ledger state where available.
#[derive(Debug)]
pub struct ElectionView {
    pub election: ElectionRecord,
    pub candidates: Vec<CandidateRecord>,
    pub onchain: Option<ElectionInfo>,
    /// Enrichment failure is reported alongside the local data, never
    /// allowed to mask it.
    pub onchain_error: Option<String>,
}

/// Election results, labelled with their source.
#[derive(Debug)]
pub enum ElectionResults {
    /// Read live from the ledger.
    Ledger {
        tallies: Vec<evote_chain::CandidateTally>,
        integrity: Option<IntegrityReport>,
    },
    /// The cached snapshot from the last successful sync.
    Cached { rows: Vec<ResultRecord> },
}

/// Turnout and progress analytics for one election.
#[derive(Debug)]
pub struct ElectionAnalytics {
    pub election_name: String,
    pub status: ElectionStatus,
    pub total_registered_voters: Option<u64>,
    pub total_commits: Option<u64>,
    pub total_reveals: Option<u64>,
    /// Commits / registered voters, percent, two decimals.
    pub turnout_pct: Option<f64>,
    /// Reveals / commits, percent, two decimals.
    pub reveal_rate_pct: Option<f64>,
    pub phase: Option<String>,
    pub is_finalized: Option<bool>,
    pub is_cancelled: Option<bool>,
    pub chain_error: Option<String>,
}

pub struct ElectionCoordinator<S, C, K> {
    store: Arc<S>,
    chain: Arc<C>,
    clock: Arc<K>,
}

impl<S, C, K> ElectionCoordinator<S, C, K>
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

    /// Create an election: validate, persist the local record, then attempt
    /// ledger deployment.
    ///
    /// Validation failures reject the request before any write. A ledger
    /// failure after the local write leaves the record at `pending` and is
    /// reported as a partial success, not an error.
    pub async fn create_election(
        &self,
        spec: NewElection,
    ) -> Result<CreationOutcome, EngineError> {
        let now = self.clock.now();

        if !spec.commit_deadline.is_after(now) {
            return Err(EngineError::Validation(
                "commit deadline must be in the future".into(),
            ));
        }
        if !spec.reveal_deadline.is_after(spec.commit_deadline) {
            return Err(EngineError::Validation(
                "reveal deadline must be after commit deadline".into(),
            ));
        }
        if spec.candidates.len() < 2 {
            return Err(EngineError::Validation(
                "at least 2 candidates required".into(),
            ));
        }

        let record = ElectionRecord {
            id: 0,
            onchain_id: None,
            name: spec.name.clone(),
            description: spec.description.clone(),
            election_type: spec.election_type,
            constituency_id: spec.constituency_id,
            ballot_address: None,
            commit_deadline: spec.commit_deadline,
            reveal_deadline: spec.reveal_deadline,
            status: ElectionStatus::Pending,
            created_by: spec.created_by.clone(),
            tx_hash: None,
            created_at: now,
            updated_at: now,
        };
        let candidate_rows: Vec<CandidateRecord> = spec
            .candidates
            .iter()
            .map(|c| CandidateRecord {
                id: 0,
                election_id: 0,
                onchain_id: None,
                name: c.name.clone(),
                party: if c.party.is_empty() {
                    "Independent".to_string()
                } else {
                    c.party.clone()
                },
                description: c.description.clone(),
            })
            .collect();

        // Local record first: a durable row exists even if deployment never
        // succeeds.
        let id = self.store.create_election(&record, &candidate_rows)?;
        let mut stored = self.store.get_election(id)?;
        let candidates = self.store.candidates_of(id)?;

        let deployment = self
            .chain
            .deploy_election(&DeployElection {
                name: spec.name,
                description: spec.description,
                commit_deadline: spec.commit_deadline.as_secs(),
                reveal_deadline: spec.reveal_deadline.as_secs(),
                candidate_names: candidates.iter().map(|c| c.name.clone()).collect(),
                candidate_parties: candidates.iter().map(|c| c.party.clone()).collect(),
                constituency_id: spec.constituency_id,
                election_type_code: spec.election_type.code(),
            })
            .await;

        match deployment {
            Ok(deployed) => {
                stored.onchain_id = Some(deployed.onchain_id);
                stored.ballot_address = Some(deployed.ballot_address);
                stored.tx_hash = Some(deployed.tx_hash);
                stored.status = ElectionStatus::Active;
                stored.updated_at = self.clock.now();
                self.store.update_election(&stored)?;
                tracing::info!(election_id = id, "election created and deployed");
                Ok(CreationOutcome {
                    election: stored,
                    candidates,
                    deployed: true,
                    chain_error: None,
                })
            }
            Err(err) => {
                // Local half stands; the ledger half is outstanding and can
                // be retried via `retry_deployment`.
                tracing::warn!(election_id = id, %err, "ballot deployment failed; election left pending");
                Ok(CreationOutcome {
                    election: stored,
                    candidates,
                    deployed: false,
                    chain_error: Some(err.to_string()),
                })
            }
        }
    }

    /// Retry ledger deployment for a pending election whose first deployment
    /// failed. Unlike creation, a ledger failure here is an error — the
    /// caller asked for the ledger half specifically.
    pub async fn retry_deployment(&self, election_id: u64) -> Result<ElectionRecord, EngineError> {
        let mut record = self
            .store
            .get_election(election_id)
            .map_err(|e| EngineError::from_lookup(e, format!("election {election_id}")))?;

        if record.is_deployed() {
            return Err(EngineError::AlreadyDeployed(election_id));
        }
        if record.status != ElectionStatus::Pending {
            return Err(EngineError::Validation(format!(
                "election {election_id} is {} and cannot be deployed",
                record.status
            )));
        }

        let candidates = self.store.candidates_of(election_id)?;
        let deployed = self
            .chain
            .deploy_election(&DeployElection {
                name: record.name.clone(),
                description: record.description.clone(),
                commit_deadline: record.commit_deadline.as_secs(),
                reveal_deadline: record.reveal_deadline.as_secs(),
                candidate_names: candidates.iter().map(|c| c.name.clone()).collect(),
                candidate_parties: candidates.iter().map(|c| c.party.clone()).collect(),
                constituency_id: record.constituency_id,
                election_type_code: record.election_type.code(),
            })
            .await?;

        record.onchain_id = Some(deployed.onchain_id);
        record.ballot_address = Some(deployed.ballot_address);
        record.tx_hash = Some(deployed.tx_hash);
        record.status = ElectionStatus::Active;
        record.updated_at = self.clock.now();
        self.store.update_election(&record)?;
        tracing::info!(election_id, "pending election deployed on retry");
        Ok(record)
    }

    /// Cancel an election. Once a ballot contract exists this is
    /// ledger-first and all-or-nothing: a failed on-chain cancel aborts the
    /// operation with local status unchanged. With no deployed ballot the
    /// cancellation is purely local.
    pub async fn cancel_election(
        &self,
        election_id: u64,
        reason: &str,
    ) -> Result<ElectionRecord, EngineError> {
        let mut record = self
            .store
            .get_election(election_id)
            .map_err(|e| EngineError::from_lookup(e, format!("election {election_id}")))?;

        if record.status.is_terminal() {
            return Err(EngineError::Validation(format!(
                "election {election_id} is already {}",
                record.status
            )));
        }

        if let Some(ballot) = &record.ballot_address {
            // Local status flips only on a confirmed on-chain cancel.
            let tx_hash = self.chain.cancel_election(ballot, reason).await?;
            record.tx_hash = Some(tx_hash);
        }

        record.status = ElectionStatus::Cancelled;
        record.updated_at = self.clock.now();
        self.store.update_election(&record)?;
        tracing::info!(election_id, reason, "election cancelled");
        Ok(record)
    }

    /// One election with its candidates, enriched with ledger state when a
    /// ballot is deployed.
    pub async fn get_election(&self, election_id: u64) -> Result<ElectionView, EngineError> {
        let record = self
            .store
            .get_election(election_id)
            .map_err(|e| EngineError::from_lookup(e, format!("election {election_id}")))?;
        let candidates = self.store.candidates_of(election_id)?;
        let view = self.enrich(record, candidates).await;
        Ok(view)
    }

    /// All elections (optionally filtered by status), each enriched with
    /// ledger state where available.
    pub async fn list_elections(
        &self,
        status: Option<ElectionStatus>,
    ) -> Result<Vec<ElectionView>, EngineError> {
        let records = self.store.iter_elections(status)?;
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let candidates = self.store.candidates_of(record.id)?;
            views.push(self.enrich(record, candidates).await);
        }
        Ok(views)
    }

    async fn enrich(
        &self,
        record: ElectionRecord,
        candidates: Vec<CandidateRecord>,
    ) -> ElectionView {
        let (onchain, onchain_error) = match &record.ballot_address {
            Some(ballot) => match self.chain.get_election_info(ballot).await {
                Ok(info) => (Some(info), None),
                Err(e) => (None, Some(e.to_string())),
            },
            None => (None, None),
        };
        ElectionView {
            election: record,
            candidates,
            onchain,
            onchain_error,
        }
    }

    /// Election results: live from the ledger when reachable, otherwise the
    /// cached snapshot from the last successful sync.
    pub async fn election_results(
        &self,
        election_id: u64,
    ) -> Result<ElectionResults, EngineError> {
        let record = self
            .store
            .get_election(election_id)
            .map_err(|e| EngineError::from_lookup(e, format!("election {election_id}")))?;

        if let Some(ballot) = &record.ballot_address {
            match self.chain.get_ballot_results(ballot).await {
                Ok(tallies) => {
                    let integrity = self.chain.verify_election_integrity(ballot).await.ok();
                    return Ok(ElectionResults::Ledger { tallies, integrity });
                }
                Err(err) => {
                    tracing::warn!(election_id, %err, "ledger read failed, falling back to cache");
                }
            }
        }

        let rows = self.store.results_for(election_id)?;
        Ok(ElectionResults::Cached { rows })
    }

    /// Mirror the ledger's finalization flag into the local status.
    pub async fn mirror_finalization(
        &self,
        election_id: u64,
    ) -> Result<ElectionRecord, EngineError> {
        let mut record = self
            .store
            .get_election(election_id)
            .map_err(|e| EngineError::from_lookup(e, format!("election {election_id}")))?;
        let ballot = record
            .ballot_address
            .clone()
            .ok_or(EngineError::NotDeployed(election_id))?;

        let info = self.chain.get_election_info(&ballot).await?;
        if info.is_finalized && record.status.can_advance_to(ElectionStatus::Finalized) {
            record.status = ElectionStatus::Finalized;
            record.updated_at = self.clock.now();
            self.store.update_election(&record)?;
            tracing::info!(election_id, "election finalized");
        }
        Ok(record)
    }

    /// Turnout and reveal-rate analytics. Read-only; a ledger failure
    /// surfaces inside the report rather than failing it.
    pub async fn analytics(&self, election_id: u64) -> Result<ElectionAnalytics, EngineError> {
        let record = self
            .store
            .get_election(election_id)
            .map_err(|e| EngineError::from_lookup(e, format!("election {election_id}")))?;

        let mut analytics = ElectionAnalytics {
            election_name: record.name.clone(),
            status: record.status,
            total_registered_voters: None,
            total_commits: None,
            total_reveals: None,
            turnout_pct: None,
            reveal_rate_pct: None,
            phase: None,
            is_finalized: None,
            is_cancelled: None,
            chain_error: None,
        };

        let Some(ballot) = &record.ballot_address else {
            return Ok(analytics);
        };

        let ledger = async {
            let info = self.chain.get_election_info(ballot).await?;
            let total_registered = self.chain.get_total_voters().await?;
            Ok::<_, EngineError>((info, total_registered))
        };

        match ledger.await {
            Ok((info, total_registered)) => {
                analytics.total_registered_voters = Some(total_registered);
                analytics.total_commits = Some(info.total_commits);
                analytics.total_reveals = Some(info.total_reveals);
                analytics.turnout_pct = Some(percentage(info.total_commits, total_registered));
                analytics.reveal_rate_pct =
                    Some(percentage(info.total_reveals, info.total_commits));
                analytics.phase = Some(info.phase);
                analytics.is_finalized = Some(info.is_finalized);
                analytics.is_cancelled = Some(info.is_cancelled);
            }
            Err(err) => analytics.chain_error = Some(err.to_string()),
        }

        Ok(analytics)
    }
}

/// `part / whole` as a percentage, rounded to two decimals; 0 when the
/// denominator is zero.
fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::percentage;

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(50, 100), 50.0);
    }

    #[test]
    fn percentage_of_zero_denominator_is_zero() {
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(0, 10), 0.0);
    }
}
