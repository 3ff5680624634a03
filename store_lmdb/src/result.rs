//! LMDB implementation of ResultStore.

use evote_store::{ResultRecord, ResultStore, StoreError};

use crate::environment::{composite_key, LmdbStore};
use crate::LmdbError;

impl ResultStore for LmdbStore {
    fn replace_results(
        &self,
        election_id: u64,
        rows: &[ResultRecord],
    ) -> Result<(), StoreError> {
        let prefix = election_id.to_be_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        // Delete-then-insert inside one transaction: a failure below aborts
        // the whole replacement and the old snapshot survives.
        let old_keys: Vec<Vec<u8>> = {
            let iter = self
                .results_db
                .prefix_iter(&wtxn, &prefix)
                .map_err(LmdbError::from)?;
            let mut keys = Vec::new();
            for item in iter {
                let (key, _val) = item.map_err(LmdbError::from)?;
                keys.push(key.to_vec());
            }
            keys
        };
        for key in &old_keys {
            self.results_db
                .delete(&mut wtxn, key)
                .map_err(LmdbError::from)?;
        }

        for row in rows {
            let key = composite_key(election_id, &row.candidate_id.to_be_bytes());
            let bytes = bincode::serialize(row).map_err(LmdbError::from)?;
            self.results_db
                .put(&mut wtxn, &key, &bytes)
                .map_err(LmdbError::from)?;
        }

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn results_for(&self, election_id: u64) -> Result<Vec<ResultRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        let prefix = election_id.to_be_bytes();
        let iter = self
            .results_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for item in iter {
            let (_key, val) = item.map_err(LmdbError::from)?;
            out.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(out)
    }
}
