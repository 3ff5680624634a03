//! LMDB environment setup and database handles.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

/// Default map size: 1 GiB. LMDB grows the file lazily.
const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;
const MAX_DBS: u32 = 8;

pub(crate) const NEXT_ELECTION_ID_KEY: &[u8] = b"next_election_id";

/// LMDB-backed store implementing every `evote-store` trait.
///
/// One environment, one database per entity plus secondary indexes:
/// - `voters`           wallet address → VoterRecord
/// - `voter_identity`   identity hash bytes → wallet address
/// - `elections`        election id (BE bytes) → ElectionRecord
/// - `election_ballot`  ballot address → election id
/// - `candidates`       election id ++ candidate id → CandidateRecord
/// - `receipts`         election id ++ wallet address → ReceiptRecord
/// - `results`          election id ++ candidate id → ResultRecord
/// - `meta`             counters (next election id)
pub struct LmdbStore {
    pub(crate) env: Arc<Env>,
    pub(crate) voters_db: Database<Bytes, Bytes>,
    pub(crate) voter_identity_db: Database<Bytes, Bytes>,
    pub(crate) elections_db: Database<Bytes, Bytes>,
    pub(crate) election_ballot_db: Database<Bytes, Bytes>,
    pub(crate) candidates_db: Database<Bytes, Bytes>,
    pub(crate) receipts_db: Database<Bytes, Bytes>,
    pub(crate) results_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create the store at `path` with the default map size.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    /// Open or create the store at `path`.
    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("create data dir: {e}")))?;

        // Safety: the environment directory is owned by this process and not
        // opened twice (LMDB's documented single-open requirement).
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let voters_db = env.create_database(&mut wtxn, Some("voters"))?;
        let voter_identity_db = env.create_database(&mut wtxn, Some("voter_identity"))?;
        let elections_db = env.create_database(&mut wtxn, Some("elections"))?;
        let election_ballot_db = env.create_database(&mut wtxn, Some("election_ballot"))?;
        let candidates_db = env.create_database(&mut wtxn, Some("candidates"))?;
        let receipts_db = env.create_database(&mut wtxn, Some("receipts"))?;
        let results_db = env.create_database(&mut wtxn, Some("results"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB store");

        Ok(Self {
            env: Arc::new(env),
            voters_db,
            voter_identity_db,
            elections_db,
            election_ballot_db,
            candidates_db,
            receipts_db,
            results_db,
            meta_db,
        })
    }
}

/// Composite key: election id (8 BE bytes) followed by a second component.
pub(crate) fn composite_key(election_id: u64, rest: &[u8]) -> Vec<u8> {
    let mut key = election_id.to_be_bytes().to_vec();
    key.extend_from_slice(rest);
    key
}
