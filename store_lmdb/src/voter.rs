//! LMDB implementation of VoterStore.

use evote_store::{StoreError, VoterRecord, VoterStore};
use evote_types::{IdentityHash, WalletAddress};

use crate::environment::LmdbStore;
use crate::LmdbError;

impl VoterStore for LmdbStore {
    fn insert_voter(&self, record: &VoterRecord) -> Result<(), StoreError> {
        let wallet_key = record.wallet_address.as_str().as_bytes();
        let identity_key = record.identity_hash.as_bytes();

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        if self
            .voters_db
            .get(&wtxn, wallet_key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(LmdbError::Duplicate(format!(
                "wallet {}",
                record.wallet_address
            )))?;
        }
        if self
            .voter_identity_db
            .get(&wtxn, identity_key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(LmdbError::Duplicate(format!(
                "identity {}",
                record.identity_hash
            )))?;
        }

        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        self.voters_db
            .put(&mut wtxn, wallet_key, &bytes)
            .map_err(LmdbError::from)?;
        self.voter_identity_db
            .put(&mut wtxn, identity_key, wallet_key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_voter(&self, wallet: &WalletAddress) -> Result<VoterRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .voters_db
            .get(&rtxn, wallet.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("voter {wallet}")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn find_by_identity(
        &self,
        identity: &IdentityHash,
    ) -> Result<Option<VoterRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(wallet_key) = self
            .voter_identity_db
            .get(&rtxn, identity.as_bytes())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let bytes = self
            .voters_db
            .get(&rtxn, wallet_key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                LmdbError::Heed("identity index points at missing voter".to_string())
            })?;
        Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?))
    }

    fn update_voter(&self, record: &VoterRecord) -> Result<(), StoreError> {
        let wallet_key = record.wallet_address.as_str().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .voters_db
            .get(&wtxn, wallet_key)
            .map_err(LmdbError::from)?
            .is_none()
        {
            return Err(LmdbError::NotFound(format!(
                "voter {}",
                record.wallet_address
            )))?;
        }
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        self.voters_db
            .put(&mut wtxn, wallet_key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_voters(&self) -> Result<Vec<VoterRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        let iter = self.voters_db.iter(&rtxn).map_err(LmdbError::from)?;
        for item in iter {
            let (_key, val) = item.map_err(LmdbError::from)?;
            out.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(out)
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.voters_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
