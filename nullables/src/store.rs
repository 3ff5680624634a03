//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use evote_store::{
    CandidateRecord, ElectionRecord, ElectionStore, ReceiptRecord, ReceiptStore, ResultRecord,
    ResultStore, StoreError, VoterRecord, VoterStore,
};
use evote_types::{ElectionStatus, IdentityHash, WalletAddress};

/// An in-memory implementation of every store trait.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    voters: Mutex<HashMap<String, VoterRecord>>,
    elections: Mutex<HashMap<u64, ElectionRecord>>,
    candidates: Mutex<HashMap<u64, Vec<CandidateRecord>>>,
    receipts: Mutex<HashMap<(u64, String), ReceiptRecord>>,
    results: Mutex<HashMap<u64, Vec<ResultRecord>>>,
    next_election_id: Mutex<u64>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            voters: Mutex::new(HashMap::new()),
            elections: Mutex::new(HashMap::new()),
            candidates: Mutex::new(HashMap::new()),
            receipts: Mutex::new(HashMap::new()),
            results: Mutex::new(HashMap::new()),
            next_election_id: Mutex::new(1),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VoterStore for NullStore {
    fn insert_voter(&self, record: &VoterRecord) -> Result<(), StoreError> {
        let mut voters = self.voters.lock().unwrap();
        let key = record.wallet_address.as_str().to_string();
        if voters.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "wallet {}",
                record.wallet_address
            )));
        }
        if voters
            .values()
            .any(|v| v.identity_hash == record.identity_hash)
        {
            return Err(StoreError::Duplicate(format!(
                "identity {}",
                record.identity_hash
            )));
        }
        voters.insert(key, record.clone());
        Ok(())
    }

    fn get_voter(&self, wallet: &WalletAddress) -> Result<VoterRecord, StoreError> {
        self.voters
            .lock()
            .unwrap()
            .get(wallet.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("voter {wallet}")))
    }

    fn find_by_identity(
        &self,
        identity: &IdentityHash,
    ) -> Result<Option<VoterRecord>, StoreError> {
        Ok(self
            .voters
            .lock()
            .unwrap()
            .values()
            .find(|v| &v.identity_hash == identity)
            .cloned())
    }

    fn update_voter(&self, record: &VoterRecord) -> Result<(), StoreError> {
        let mut voters = self.voters.lock().unwrap();
        let key = record.wallet_address.as_str().to_string();
        if !voters.contains_key(&key) {
            return Err(StoreError::NotFound(format!(
                "voter {}",
                record.wallet_address
            )));
        }
        voters.insert(key, record.clone());
        Ok(())
    }

    fn iter_voters(&self) -> Result<Vec<VoterRecord>, StoreError> {
        Ok(self.voters.lock().unwrap().values().cloned().collect())
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        Ok(self.voters.lock().unwrap().len() as u64)
    }
}

impl ElectionStore for NullStore {
    fn create_election(
        &self,
        election: &ElectionRecord,
        candidates: &[CandidateRecord],
    ) -> Result<u64, StoreError> {
        let mut next_id = self.next_election_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let mut stored = election.clone();
        stored.id = id;
        self.elections.lock().unwrap().insert(id, stored);

        let rows: Vec<CandidateRecord> = candidates
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let mut row = c.clone();
                row.id = idx as u64 + 1;
                row.election_id = id;
                row
            })
            .collect();
        self.candidates.lock().unwrap().insert(id, rows);
        Ok(id)
    }

    fn get_election(&self, id: u64) -> Result<ElectionRecord, StoreError> {
        self.elections
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("election {id}")))
    }

    fn find_by_ballot(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Option<ElectionRecord>, StoreError> {
        Ok(self
            .elections
            .lock()
            .unwrap()
            .values()
            .find(|e| e.ballot_address.as_ref() == Some(ballot))
            .cloned())
    }

    fn update_election(&self, record: &ElectionRecord) -> Result<(), StoreError> {
        let mut elections = self.elections.lock().unwrap();
        if !elections.contains_key(&record.id) {
            return Err(StoreError::NotFound(format!("election {}", record.id)));
        }
        elections.insert(record.id, record.clone());
        Ok(())
    }

    fn candidates_of(&self, election_id: u64) -> Result<Vec<CandidateRecord>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .get(&election_id)
            .cloned()
            .unwrap_or_default())
    }

    fn iter_elections(
        &self,
        status: Option<ElectionStatus>,
    ) -> Result<Vec<ElectionRecord>, StoreError> {
        let mut out: Vec<ElectionRecord> = self
            .elections
            .lock()
            .unwrap()
            .values()
            .filter(|e| status.is_none() || status == Some(e.status))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }
}

impl ReceiptStore for NullStore {
    fn insert_receipt(&self, record: &ReceiptRecord) -> Result<(), StoreError> {
        let mut receipts = self.receipts.lock().unwrap();
        let key = (
            record.election_id,
            record.voter_address.as_str().to_string(),
        );
        if receipts.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "receipt election={} voter={}",
                record.election_id, record.voter_address
            )));
        }
        receipts.insert(key, record.clone());
        Ok(())
    }

    fn get_receipt(
        &self,
        election_id: u64,
        voter: &WalletAddress,
    ) -> Result<ReceiptRecord, StoreError> {
        self.receipts
            .lock()
            .unwrap()
            .get(&(election_id, voter.as_str().to_string()))
            .cloned()
            .ok_or_else(|| {
                StoreError::NotFound(format!("receipt election={election_id} voter={voter}"))
            })
    }

    fn update_receipt(&self, record: &ReceiptRecord) -> Result<(), StoreError> {
        let mut receipts = self.receipts.lock().unwrap();
        let key = (
            record.election_id,
            record.voter_address.as_str().to_string(),
        );
        if !receipts.contains_key(&key) {
            return Err(StoreError::NotFound(format!(
                "receipt election={} voter={}",
                record.election_id, record.voter_address
            )));
        }
        receipts.insert(key, record.clone());
        Ok(())
    }

    fn receipts_for_voter(
        &self,
        voter: &WalletAddress,
    ) -> Result<Vec<ReceiptRecord>, StoreError> {
        let mut out: Vec<ReceiptRecord> = self
            .receipts
            .lock()
            .unwrap()
            .values()
            .filter(|r| &r.voter_address == voter)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.committed_at.cmp(&a.committed_at));
        Ok(out)
    }
}

impl ResultStore for NullStore {
    fn replace_results(
        &self,
        election_id: u64,
        rows: &[ResultRecord],
    ) -> Result<(), StoreError> {
        self.results
            .lock()
            .unwrap()
            .insert(election_id, rows.to_vec());
        Ok(())
    }

    fn results_for(&self, election_id: u64) -> Result<Vec<ResultRecord>, StoreError> {
        Ok(self
            .results
            .lock()
            .unwrap()
            .get(&election_id)
            .cloned()
            .unwrap_or_default())
    }
}
