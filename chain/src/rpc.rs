//! The ledger capability set coordinators depend on.

use evote_types::{IdentityHash, ReceiptHash, TxHash, WalletAddress};

use crate::types::{
    BallotCandidate, BallotDeployment, CandidateTally, ChainStatus, CommitStatus, DeployElection,
    ElectionInfo, ElectionSummary, IntegrityReport, VoterInfo,
};
use crate::ChainError;

/// Capability-typed ledger interface.
///
/// Read methods are pure queries against deployed contract state: no side
/// effects, freely retriable. Write methods submit state-changing
/// transactions through the implementation's serialized write path.
///
/// Coordinators are generic over this trait; [`crate::ChainClient`] is the
/// production implementation and tests substitute a deterministic double.
#[allow(async_fn_in_trait)]
pub trait ChainRpc {
    // ── Reads ───────────────────────────────────────────────────────────

    async fn chain_status(&self) -> Result<ChainStatus, ChainError>;
    async fn get_election_info(&self, ballot: &WalletAddress)
        -> Result<ElectionInfo, ChainError>;
    async fn get_ballot_candidates(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Vec<BallotCandidate>, ChainError>;
    async fn get_ballot_results(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Vec<CandidateTally>, ChainError>;
    async fn get_voter_info(&self, wallet: &WalletAddress) -> Result<VoterInfo, ChainError>;
    async fn is_voter_eligible(&self, wallet: &WalletAddress) -> Result<bool, ChainError>;
    async fn get_voter_commit_status(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<CommitStatus, ChainError>;
    async fn verify_receipt(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
        receipt_hash: &ReceiptHash,
    ) -> Result<bool, ChainError>;
    async fn verify_election_integrity(
        &self,
        ballot: &WalletAddress,
    ) -> Result<IntegrityReport, ChainError>;
    async fn get_election_summary(
        &self,
        ballot: &WalletAddress,
    ) -> Result<ElectionSummary, ChainError>;
    async fn did_voter_participate(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<bool, ChainError>;
    async fn get_total_voters(&self) -> Result<u64, ChainError>;

    // ── Writes ──────────────────────────────────────────────────────────

    async fn register_voter(
        &self,
        wallet: &WalletAddress,
        identity_hash: &IdentityHash,
        constituency_id: u32,
    ) -> Result<TxHash, ChainError>;

    /// Deploy a ballot contract and wait for its receipt; the receipt
    /// carries the new on-chain id and contract address.
    async fn deploy_election(
        &self,
        params: &DeployElection,
    ) -> Result<BallotDeployment, ChainError>;

    async fn cancel_election(
        &self,
        ballot: &WalletAddress,
        reason: &str,
    ) -> Result<TxHash, ChainError>;

    async fn deactivate_voter(
        &self,
        wallet: &WalletAddress,
        reason: &str,
    ) -> Result<TxHash, ChainError>;

    async fn reactivate_voter(&self, wallet: &WalletAddress) -> Result<TxHash, ChainError>;
}
