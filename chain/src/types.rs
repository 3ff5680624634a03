//! Typed responses for ledger queries.
//!
//! Every read returns a fixed structured record rather than loose JSON, so
//! callers can't silently depend on undocumented fields.

use serde::{Deserialize, Serialize};

use evote_types::{TxHash, WalletAddress};

/// Connectivity and network information.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainStatus {
    pub chain_id: u64,
    pub block_number: u64,
}

/// Per-ballot commit/reveal counters and lifecycle flags.
#[derive(Debug, Clone, Deserialize)]
pub struct ElectionInfo {
    pub total_commits: u64,
    pub total_reveals: u64,
    /// Ledger-side phase label ("commit", "reveal", "tally", "closed").
    pub phase: String,
    pub is_finalized: bool,
    pub is_cancelled: bool,
}

/// A candidate as registered on the ballot contract.
#[derive(Debug, Clone, Deserialize)]
pub struct BallotCandidate {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub party: String,
}

/// One candidate's tally as reported by the ballot contract.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateTally {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub party: String,
    pub vote_count: u64,
}

/// A voter's entry in the on-chain registry.
#[derive(Debug, Clone, Deserialize)]
pub struct VoterInfo {
    pub registered: bool,
    pub active: bool,
    #[serde(default)]
    pub constituency_id: u32,
}

/// A voter's commit/reveal progress on one ballot.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitStatus {
    pub has_committed: bool,
    pub has_revealed: bool,
}

/// Consistency report from the verifier contract.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrityReport {
    pub total_commits: u64,
    pub total_reveals: u64,
    /// Reveals never exceed commits and every reveal matches a commitment.
    pub is_consistent: bool,
}

/// Compact election summary from the verifier contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ElectionSummary {
    pub phase: String,
    pub total_commits: u64,
    pub total_reveals: u64,
    pub is_finalized: bool,
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// "confirmed" or "reverted".
    pub status: String,
    #[serde(default)]
    pub revert_reason: Option<String>,
    /// Address of a contract created by this transaction, if any.
    #[serde(default)]
    pub contract_address: Option<WalletAddress>,
    /// Identifier emitted by the election factory on deployment.
    #[serde(default)]
    pub onchain_id: Option<u64>,
}

impl TxReceipt {
    pub fn is_confirmed(&self) -> bool {
        self.status == "confirmed"
    }
}

/// Parameters for deploying a ballot contract through the election factory.
#[derive(Debug, Clone, Serialize)]
pub struct DeployElection {
    pub name: String,
    pub description: String,
    pub commit_deadline: u64,
    pub reveal_deadline: u64,
    pub candidate_names: Vec<String>,
    pub candidate_parties: Vec<String>,
    pub constituency_id: u32,
    pub election_type_code: u8,
}

/// Outcome of a confirmed ballot deployment.
#[derive(Debug, Clone)]
pub struct BallotDeployment {
    pub onchain_id: u64,
    pub ballot_address: WalletAddress,
    pub tx_hash: TxHash,
}
