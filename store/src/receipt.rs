//! Vote receipt storage trait.

use serde::{Deserialize, Serialize};

use evote_types::{ReceiptHash, Timestamp, TxHash, VotePhase, WalletAddress};

use crate::StoreError;

/// Local bookkeeping record of a voter's commit (and later reveal) against a
/// ballot. Not proof of participation — the ledger is authoritative; this is
/// the metadata layer's anti-double-voting record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub election_id: u64,
    pub voter_address: WalletAddress,
    pub receipt_hash: ReceiptHash,
    pub commit_tx_hash: Option<TxHash>,
    pub reveal_tx_hash: Option<TxHash>,
    pub phase: VotePhase,
    pub committed_at: Timestamp,
    pub revealed_at: Option<Timestamp>,
}

/// Trait for vote receipt storage.
///
/// `insert_receipt` must enforce the one-receipt-per-`(election, voter)`
/// invariant: a second insert for the same pair fails with
/// [`StoreError::Duplicate`] and leaves the existing receipt untouched.
pub trait ReceiptStore {
    fn insert_receipt(&self, record: &ReceiptRecord) -> Result<(), StoreError>;

    fn get_receipt(
        &self,
        election_id: u64,
        voter: &WalletAddress,
    ) -> Result<ReceiptRecord, StoreError>;

    fn update_receipt(&self, record: &ReceiptRecord) -> Result<(), StoreError>;

    /// All receipts for a wallet, most recent commit first.
    fn receipts_for_voter(&self, voter: &WalletAddress)
        -> Result<Vec<ReceiptRecord>, StoreError>;
}
