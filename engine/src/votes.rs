//! Vote reconciliation tracker — commit/reveal receipt bookkeeping.
//!
//! The voter performs the actual commit and reveal directly against the
//! ledger from their own wallet; this component only records receipts and
//! enforces the one-receipt-per-voter-per-election invariant at the
//! metadata layer. The ledger enforces the real prohibition, and it alone
//! is authoritative for proof of participation.

use std::sync::Arc;

use evote_chain::{ChainRpc, CommitStatus};
use evote_store::{ElectionStore, ReceiptRecord, ReceiptStore, StoreError};
use evote_types::{Clock, ReceiptHash, TxHash, VotePhase, WalletAddress};

use crate::EngineError;

/// Ledger verdict on a receipt, with the voter's on-chain progress.
#[derive(Debug)]
pub struct ReceiptVerification {
    pub receipt_valid: bool,
    pub voter_status: CommitStatus,
}

pub struct VoteTracker<S, C, K> {
    store: Arc<S>,
    chain: Arc<C>,
    clock: Arc<K>,
}

impl<S, C, K> VoteTracker<S, C, K>
where
    S: ElectionStore + ReceiptStore,
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

    async fn resolve_ballot(
        &self,
        ballot: &WalletAddress,
    ) -> Result<evote_store::ElectionRecord, EngineError> {
        self.store
            .find_by_ballot(ballot)?
            .ok_or_else(|| EngineError::NotFound(format!("election for ballot {ballot}")))
    }

    /// Record that a voter committed on a ballot. Purely bookkeeping — no
    /// transaction is submitted here.
    pub async fn record_commit(
        &self,
        ballot: &WalletAddress,
        commit_hash: ReceiptHash,
        voter: &WalletAddress,
        commit_tx_hash: Option<TxHash>,
    ) -> Result<ReceiptRecord, EngineError> {
        let election = self.resolve_ballot(ballot).await?;

        let record = ReceiptRecord {
            election_id: election.id,
            voter_address: voter.clone(),
            receipt_hash: commit_hash,
            commit_tx_hash,
            reveal_tx_hash: None,
            phase: VotePhase::Committed,
            committed_at: self.clock.now(),
            revealed_at: None,
        };

        match self.store.insert_receipt(&record) {
            Ok(()) => {
                tracing::info!(election_id = election.id, %voter, "commit receipt recorded");
                Ok(record)
            }
            Err(StoreError::Duplicate(_)) => Err(EngineError::DuplicateReceipt {
                election_id: election.id,
                voter: voter.clone(),
            }),
            Err(other) => Err(other.into()),
        }
    }

    /// Record that a voter completed the reveal phase. Requires an existing
    /// committed-phase receipt; the transition is strictly one-directional
    /// and a second reveal is rejected without touching the timestamps.
    pub async fn record_reveal(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
        reveal_tx_hash: Option<TxHash>,
    ) -> Result<ReceiptRecord, EngineError> {
        let election = self.resolve_ballot(ballot).await?;

        let mut record = self
            .store
            .get_receipt(election.id, voter)
            .map_err(|e| {
                EngineError::from_lookup(
                    e,
                    format!("commit receipt for {voter} in election {}", election.id),
                )
            })?;

        if record.phase.is_revealed() {
            return Err(EngineError::AlreadyRevealed {
                election_id: election.id,
                voter: voter.clone(),
            });
        }

        record.phase = VotePhase::Revealed;
        record.reveal_tx_hash = reveal_tx_hash;
        record.revealed_at = Some(self.clock.now());
        self.store.update_receipt(&record)?;
        tracing::info!(election_id = election.id, %voter, "reveal recorded");
        Ok(record)
    }

    /// Verify a receipt against the ledger. The local receipt table is a UX
    /// convenience only; the ledger's verdict is what this returns.
    pub async fn verify_receipt(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
        receipt_hash: &ReceiptHash,
    ) -> Result<ReceiptVerification, EngineError> {
        let receipt_valid = self.chain.verify_receipt(ballot, voter, receipt_hash).await?;
        let voter_status = self.chain.get_voter_commit_status(ballot, voter).await?;
        Ok(ReceiptVerification {
            receipt_valid,
            voter_status,
        })
    }

    /// A voter's ledger-side commit/reveal progress on one ballot.
    pub async fn vote_status(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<CommitStatus, EngineError> {
        Ok(self.chain.get_voter_commit_status(ballot, voter).await?)
    }

    /// Quick ledger check: did this voter participate at all?
    pub async fn did_participate(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<bool, EngineError> {
        Ok(self.chain.did_voter_participate(ballot, voter).await?)
    }

    /// All local receipts for a wallet, newest first.
    pub fn voter_history(
        &self,
        voter: &WalletAddress,
    ) -> Result<Vec<ReceiptRecord>, EngineError> {
        Ok(self.store.receipts_for_voter(voter)?)
    }
}
