//! LMDB implementation of ReceiptStore.

use evote_store::{ReceiptRecord, ReceiptStore, StoreError};
use evote_types::WalletAddress;

use crate::environment::{composite_key, LmdbStore};
use crate::LmdbError;

impl ReceiptStore for LmdbStore {
    fn insert_receipt(&self, record: &ReceiptRecord) -> Result<(), StoreError> {
        let key = composite_key(
            record.election_id,
            record.voter_address.as_str().as_bytes(),
        );
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .receipts_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(LmdbError::Duplicate(format!(
                "receipt election={} voter={}",
                record.election_id, record.voter_address
            )))?;
        }
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        self.receipts_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_receipt(
        &self,
        election_id: u64,
        voter: &WalletAddress,
    ) -> Result<ReceiptRecord, StoreError> {
        let key = composite_key(election_id, voter.as_str().as_bytes());
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .receipts_db
            .get(&rtxn, &key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                LmdbError::NotFound(format!("receipt election={election_id} voter={voter}"))
            })?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn update_receipt(&self, record: &ReceiptRecord) -> Result<(), StoreError> {
        let key = composite_key(
            record.election_id,
            record.voter_address.as_str().as_bytes(),
        );
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .receipts_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_none()
        {
            return Err(LmdbError::NotFound(format!(
                "receipt election={} voter={}",
                record.election_id, record.voter_address
            )))?;
        }
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        self.receipts_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn receipts_for_voter(
        &self,
        voter: &WalletAddress,
    ) -> Result<Vec<ReceiptRecord>, StoreError> {
        // Receipts are keyed by election first, so a voter lookup is a scan.
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out: Vec<ReceiptRecord> = Vec::new();
        let iter = self.receipts_db.iter(&rtxn).map_err(LmdbError::from)?;
        for item in iter {
            let (_key, val) = item.map_err(LmdbError::from)?;
            let record: ReceiptRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            if &record.voter_address == voter {
                out.push(record);
            }
        }
        out.sort_by(|a, b| b.committed_at.cmp(&a.committed_at));
        Ok(out)
    }
}
