//! Election and candidate storage trait.

use serde::{Deserialize, Serialize};

use evote_types::{ElectionStatus, ElectionType, Timestamp, TxHash, WalletAddress};

use crate::StoreError;

/// Local record of an election.
///
/// `onchain_id` and `ballot_address` are both set (after a confirmed
/// deployment) or both unset; a half-set pair is a bug.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElectionRecord {
    /// Local identifier, assigned by the store on creation.
    pub id: u64,
    pub onchain_id: Option<u64>,
    pub name: String,
    pub description: String,
    pub election_type: ElectionType,
    pub constituency_id: u32,
    pub ballot_address: Option<WalletAddress>,
    pub commit_deadline: Timestamp,
    pub reveal_deadline: Timestamp,
    pub status: ElectionStatus,
    /// Wallet of the administrator who created the election.
    pub created_by: WalletAddress,
    /// Hash of the deployment transaction, once one is confirmed.
    pub tx_hash: Option<TxHash>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ElectionRecord {
    /// Whether a ballot contract has been deployed for this election.
    pub fn is_deployed(&self) -> bool {
        self.ballot_address.is_some()
    }
}

/// A candidate, owned exclusively by its election.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Candidate identifier within the election (1-based), assigned on
    /// creation.
    pub id: u64,
    pub election_id: u64,
    /// Identifier the ballot contract assigned, once deployed.
    pub onchain_id: Option<u64>,
    pub name: String,
    pub party: String,
    pub description: String,
}

/// Trait for election storage.
pub trait ElectionStore {
    /// Create an election together with its candidates as one atomic write.
    ///
    /// Assigns the election's local id (returned) and the candidates'
    /// per-election ids; either everything commits or nothing does.
    fn create_election(
        &self,
        election: &ElectionRecord,
        candidates: &[CandidateRecord],
    ) -> Result<u64, StoreError>;

    fn get_election(&self, id: u64) -> Result<ElectionRecord, StoreError>;

    /// Resolve a ballot contract address to its election, if any.
    fn find_by_ballot(&self, ballot: &WalletAddress)
        -> Result<Option<ElectionRecord>, StoreError>;

    fn update_election(&self, record: &ElectionRecord) -> Result<(), StoreError>;

    fn candidates_of(&self, election_id: u64) -> Result<Vec<CandidateRecord>, StoreError>;

    /// All elections, optionally filtered by status, newest first.
    fn iter_elections(
        &self,
        status: Option<ElectionStatus>,
    ) -> Result<Vec<ElectionRecord>, StoreError>;
}
