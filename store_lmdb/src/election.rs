//! LMDB implementation of ElectionStore.

use evote_store::{CandidateRecord, ElectionRecord, ElectionStore, StoreError};
use evote_types::{ElectionStatus, WalletAddress};

use crate::environment::{composite_key, LmdbStore, NEXT_ELECTION_ID_KEY};
use crate::LmdbError;

impl ElectionStore for LmdbStore {
    fn create_election(
        &self,
        election: &ElectionRecord,
        candidates: &[CandidateRecord],
    ) -> Result<u64, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        // Allocate the next local id inside the same transaction as the
        // record writes, so a failed creation never consumes an id.
        let next_id = match self
            .meta_db
            .get(&wtxn, NEXT_ELECTION_ID_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) if bytes.len() == 8 => {
                u64::from_le_bytes(bytes.try_into().expect("checked length"))
            }
            Some(_) => {
                return Err(LmdbError::Serialization(
                    "next_election_id has unexpected byte length".to_string(),
                ))?
            }
            None => 1,
        };
        self.meta_db
            .put(&mut wtxn, NEXT_ELECTION_ID_KEY, &(next_id + 1).to_le_bytes())
            .map_err(LmdbError::from)?;

        let mut stored = election.clone();
        stored.id = next_id;
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        self.elections_db
            .put(&mut wtxn, &next_id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;

        for (idx, candidate) in candidates.iter().enumerate() {
            let mut stored_candidate = candidate.clone();
            stored_candidate.id = idx as u64 + 1;
            stored_candidate.election_id = next_id;
            let key = composite_key(next_id, &stored_candidate.id.to_be_bytes());
            let cand_bytes = bincode::serialize(&stored_candidate).map_err(LmdbError::from)?;
            self.candidates_db
                .put(&mut wtxn, &key, &cand_bytes)
                .map_err(LmdbError::from)?;
        }

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(next_id)
    }

    fn get_election(&self, id: u64) -> Result<ElectionRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .elections_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("election {id}")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn find_by_ballot(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Option<ElectionRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(id_bytes) = self
            .election_ballot_db
            .get(&rtxn, ballot.as_str().as_bytes())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let bytes = self
            .elections_db
            .get(&rtxn, id_bytes)
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::Heed("ballot index points at missing election".into()))?;
        Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?))
    }

    fn update_election(&self, record: &ElectionRecord) -> Result<(), StoreError> {
        let id_key = record.id.to_be_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .elections_db
            .get(&wtxn, &id_key)
            .map_err(LmdbError::from)?
            .is_none()
        {
            return Err(LmdbError::NotFound(format!("election {}", record.id)))?;
        }
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        self.elections_db
            .put(&mut wtxn, &id_key, &bytes)
            .map_err(LmdbError::from)?;
        if let Some(ballot) = &record.ballot_address {
            self.election_ballot_db
                .put(&mut wtxn, ballot.as_str().as_bytes(), &id_key)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn candidates_of(&self, election_id: u64) -> Result<Vec<CandidateRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        let prefix = election_id.to_be_bytes();
        let iter = self
            .candidates_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for item in iter {
            let (_key, val) = item.map_err(LmdbError::from)?;
            out.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(out)
    }

    fn iter_elections(
        &self,
        status: Option<ElectionStatus>,
    ) -> Result<Vec<ElectionRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out: Vec<ElectionRecord> = Vec::new();
        let iter = self.elections_db.iter(&rtxn).map_err(LmdbError::from)?;
        for item in iter {
            let (_key, val) = item.map_err(LmdbError::from)?;
            let record: ElectionRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            if status.is_none() || status == Some(record.status) {
                out.push(record);
            }
        }
        // Newest first.
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }
}
