//! Voter registry storage trait.

use serde::{Deserialize, Serialize};

use evote_types::{IdentityHash, Timestamp, TxHash, WalletAddress};

use crate::StoreError;

/// A registered voter's local record.
///
/// `identity_hash` is the one-way digest of the raw external identifier; the
/// raw identifier itself is never stored. `is_registered_onchain` is set only
/// after a confirmed ledger transaction and may legitimately lag `is_active`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoterRecord {
    pub name: String,
    pub wallet_address: WalletAddress,
    pub identity_hash: IdentityHash,
    pub constituency_id: u32,
    pub is_active: bool,
    pub is_registered_onchain: bool,
    /// Hash of the last ledger transaction touching this voter's registry
    /// entry (registration, deactivation, reactivation).
    pub last_tx_hash: Option<TxHash>,
    pub created_at: Timestamp,
}

/// Trait for voter registry storage.
///
/// `insert_voter` must reject a duplicate wallet address or a duplicate
/// identity hash with [`StoreError::Duplicate`], leaving existing rows
/// untouched.
pub trait VoterStore {
    fn insert_voter(&self, record: &VoterRecord) -> Result<(), StoreError>;
    fn get_voter(&self, wallet: &WalletAddress) -> Result<VoterRecord, StoreError>;
    fn find_by_identity(&self, identity: &IdentityHash)
        -> Result<Option<VoterRecord>, StoreError>;
    fn update_voter(&self, record: &VoterRecord) -> Result<(), StoreError>;
    fn iter_voters(&self) -> Result<Vec<VoterRecord>, StoreError>;
    fn voter_count(&self) -> Result<u64, StoreError>;

    /// Count voters with the local active flag set.
    fn active_voter_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .iter_voters()?
            .iter()
            .filter(|v| v.is_active)
            .count() as u64)
    }

    /// Count voters with a confirmed on-chain registration.
    fn onchain_registered_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .iter_voters()?
            .iter()
            .filter(|v| v.is_registered_onchain)
            .count() as u64)
    }

    /// Iterate voters with pagination support.
    /// Returns up to `limit` voters starting after `cursor` (or from the
    /// beginning if None), ordered by wallet address.
    fn iter_voters_paged(
        &self,
        cursor: Option<&WalletAddress>,
        limit: usize,
    ) -> Result<Vec<VoterRecord>, StoreError> {
        let mut all = self.iter_voters()?;
        all.sort_by(|a, b| a.wallet_address.as_str().cmp(b.wallet_address.as_str()));
        let start = match cursor {
            Some(c) => all
                .iter()
                .position(|v| v.wallet_address.as_str() > c.as_str())
                .unwrap_or(all.len()),
            None => 0,
        };
        Ok(all.into_iter().skip(start).take(limit).collect())
    }
}
