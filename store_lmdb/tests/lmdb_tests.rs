use tempfile::TempDir;

use evote_store::{
    CandidateRecord, ElectionRecord, ElectionStore, ReceiptRecord, ReceiptStore, ResultRecord,
    ResultStore, StoreError, VoterRecord, VoterStore,
};
use evote_store_lmdb::LmdbStore;
use evote_types::{
    ElectionStatus, ElectionType, IdentityHash, ReceiptHash, Timestamp, VotePhase, WalletAddress,
};

fn open_store() -> (TempDir, LmdbStore) {
    let dir = TempDir::new().expect("create temp dir");
    let store = LmdbStore::open(dir.path()).expect("open store");
    (dir, store)
}

fn addr(n: u8) -> WalletAddress {
    WalletAddress::from_bytes(&[n; 20])
}

fn voter(n: u8) -> VoterRecord {
    VoterRecord {
        name: format!("Voter {n}"),
        wallet_address: addr(n),
        identity_hash: IdentityHash::new([n; 32]),
        constituency_id: 1,
        is_active: true,
        is_registered_onchain: false,
        last_tx_hash: None,
        created_at: Timestamp::new(1_000 + n as u64),
    }
}

fn election(created_by: u8) -> ElectionRecord {
    ElectionRecord {
        id: 0,
        onchain_id: None,
        name: "General 2026".to_string(),
        description: "Nationwide general election".to_string(),
        election_type: ElectionType::General,
        constituency_id: 0,
        ballot_address: None,
        commit_deadline: Timestamp::new(10_000),
        reveal_deadline: Timestamp::new(20_000),
        status: ElectionStatus::Pending,
        created_by: addr(created_by),
        tx_hash: None,
        created_at: Timestamp::new(5_000),
        updated_at: Timestamp::new(5_000),
    }
}

fn candidate(name: &str, party: &str) -> CandidateRecord {
    CandidateRecord {
        id: 0,
        election_id: 0,
        onchain_id: None,
        name: name.to_string(),
        party: party.to_string(),
        description: String::new(),
    }
}

fn result_row(election_id: u64, candidate_id: u64, votes: u64, winner: bool) -> ResultRecord {
    ResultRecord {
        election_id,
        candidate_id,
        candidate_name: format!("Candidate {candidate_id}"),
        party: "Independent".to_string(),
        vote_count: votes,
        total_commits: 100,
        total_reveals: 90,
        is_winner: winner,
        synced_at: Timestamp::new(30_000),
    }
}

// ── Voters ──────────────────────────────────────────────────────────────

#[test]
fn voter_insert_and_get_roundtrip() {
    let (_dir, store) = open_store();
    let v = voter(1);
    store.insert_voter(&v).unwrap();

    let got = store.get_voter(&v.wallet_address).unwrap();
    assert_eq!(got.name, v.name);
    assert_eq!(got.identity_hash, v.identity_hash);
    assert!(got.is_active);
}

#[test]
fn duplicate_wallet_rejected() {
    let (_dir, store) = open_store();
    store.insert_voter(&voter(1)).unwrap();

    let mut clash = voter(2);
    clash.wallet_address = addr(1);
    let err = store.insert_voter(&clash).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[test]
fn duplicate_identity_rejected() {
    let (_dir, store) = open_store();
    store.insert_voter(&voter(1)).unwrap();

    let mut clash = voter(2);
    clash.identity_hash = IdentityHash::new([1; 32]);
    let err = store.insert_voter(&clash).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[test]
fn find_by_identity_resolves_wallet() {
    let (_dir, store) = open_store();
    let v = voter(3);
    store.insert_voter(&v).unwrap();

    let found = store.find_by_identity(&v.identity_hash).unwrap().unwrap();
    assert_eq!(found.wallet_address, v.wallet_address);
    assert!(store
        .find_by_identity(&IdentityHash::new([99; 32]))
        .unwrap()
        .is_none());
}

#[test]
fn update_voter_persists_flags() {
    let (_dir, store) = open_store();
    let mut v = voter(4);
    store.insert_voter(&v).unwrap();

    v.is_active = false;
    v.is_registered_onchain = true;
    store.update_voter(&v).unwrap();

    let got = store.get_voter(&v.wallet_address).unwrap();
    assert!(!got.is_active);
    assert!(got.is_registered_onchain);
}

#[test]
fn update_missing_voter_is_not_found() {
    let (_dir, store) = open_store();
    let err = store.update_voter(&voter(9)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn voter_counts() {
    let (_dir, store) = open_store();
    for n in 1..=3 {
        store.insert_voter(&voter(n)).unwrap();
    }
    let mut v = store.get_voter(&addr(2)).unwrap();
    v.is_active = false;
    store.update_voter(&v).unwrap();

    assert_eq!(store.voter_count().unwrap(), 3);
    assert_eq!(store.active_voter_count().unwrap(), 2);
    assert_eq!(store.onchain_registered_count().unwrap(), 0);
}

#[test]
fn voter_pagination_walks_in_order() {
    let (_dir, store) = open_store();
    for n in [5u8, 1, 3, 2, 4] {
        store.insert_voter(&voter(n)).unwrap();
    }

    let page1 = store.iter_voters_paged(None, 2).unwrap();
    assert_eq!(page1.len(), 2);
    let cursor = page1.last().unwrap().wallet_address.clone();
    let page2 = store.iter_voters_paged(Some(&cursor), 10).unwrap();
    assert_eq!(page2.len(), 3);
    assert!(page2[0].wallet_address.as_str() > cursor.as_str());
}

// ── Elections ───────────────────────────────────────────────────────────

#[test]
fn create_election_assigns_ids_and_candidates() {
    let (_dir, store) = open_store();
    let id = store
        .create_election(
            &election(1),
            &[candidate("Alice", "Red"), candidate("Bob", "Blue")],
        )
        .unwrap();
    assert_eq!(id, 1);

    let stored = store.get_election(id).unwrap();
    assert_eq!(stored.id, 1);
    assert_eq!(stored.status, ElectionStatus::Pending);

    let candidates = store.candidates_of(id).unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].id, 1);
    assert_eq!(candidates[1].id, 2);
    assert!(candidates.iter().all(|c| c.election_id == id));
}

#[test]
fn election_ids_are_sequential() {
    let (_dir, store) = open_store();
    let a = store.create_election(&election(1), &[]).unwrap();
    let b = store.create_election(&election(1), &[]).unwrap();
    assert_eq!((a, b), (1, 2));
}

#[test]
fn ballot_index_resolves_after_deployment() {
    let (_dir, store) = open_store();
    let id = store.create_election(&election(1), &[]).unwrap();
    let ballot = addr(0xB0);

    assert!(store.find_by_ballot(&ballot).unwrap().is_none());

    let mut record = store.get_election(id).unwrap();
    record.ballot_address = Some(ballot.clone());
    record.onchain_id = Some(7);
    record.status = ElectionStatus::Active;
    store.update_election(&record).unwrap();

    let found = store.find_by_ballot(&ballot).unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.onchain_id, Some(7));
}

#[test]
fn iter_elections_filters_by_status() {
    let (_dir, store) = open_store();
    let a = store.create_election(&election(1), &[]).unwrap();
    let _b = store.create_election(&election(1), &[]).unwrap();

    let mut record = store.get_election(a).unwrap();
    record.status = ElectionStatus::Cancelled;
    store.update_election(&record).unwrap();

    assert_eq!(store.iter_elections(None).unwrap().len(), 2);
    let cancelled = store
        .iter_elections(Some(ElectionStatus::Cancelled))
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, a);
}

// ── Receipts ────────────────────────────────────────────────────────────

#[test]
fn receipt_uniqueness_per_election_and_voter() {
    let (_dir, store) = open_store();
    let r = ReceiptRecord {
        election_id: 1,
        voter_address: addr(1),
        receipt_hash: ReceiptHash::new([0xAA; 32]),
        commit_tx_hash: None,
        reveal_tx_hash: None,
        phase: VotePhase::Committed,
        committed_at: Timestamp::new(100),
        revealed_at: None,
    };
    store.insert_receipt(&r).unwrap();

    let mut second = r.clone();
    second.receipt_hash = ReceiptHash::new([0xBB; 32]);
    let err = store.insert_receipt(&second).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));

    // Original untouched.
    let got = store.get_receipt(1, &addr(1)).unwrap();
    assert_eq!(got.receipt_hash, r.receipt_hash);

    // Same voter, different election: fine.
    let mut other = r.clone();
    other.election_id = 2;
    store.insert_receipt(&other).unwrap();
}

#[test]
fn receipt_history_is_newest_first() {
    let (_dir, store) = open_store();
    for (eid, at) in [(1u64, 100u64), (2, 300), (3, 200)] {
        store
            .insert_receipt(&ReceiptRecord {
                election_id: eid,
                voter_address: addr(1),
                receipt_hash: ReceiptHash::new([eid as u8; 32]),
                commit_tx_hash: None,
                reveal_tx_hash: None,
                phase: VotePhase::Committed,
                committed_at: Timestamp::new(at),
                revealed_at: None,
            })
            .unwrap();
    }

    let history = store.receipts_for_voter(&addr(1)).unwrap();
    let ids: Vec<u64> = history.iter().map(|r| r.election_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

// ── Results ─────────────────────────────────────────────────────────────

#[test]
fn replace_results_swaps_the_full_set() {
    let (_dir, store) = open_store();
    store
        .replace_results(
            1,
            &[
                result_row(1, 1, 10, true),
                result_row(1, 2, 10, true),
                result_row(1, 3, 5, false),
            ],
        )
        .unwrap();
    assert_eq!(store.results_for(1).unwrap().len(), 3);

    // Second sync with a smaller set fully replaces the first.
    store
        .replace_results(1, &[result_row(1, 1, 42, true)])
        .unwrap();
    let rows = store.results_for(1).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].vote_count, 42);
}

#[test]
fn results_are_scoped_per_election() {
    let (_dir, store) = open_store();
    store.replace_results(1, &[result_row(1, 1, 5, true)]).unwrap();
    store.replace_results(2, &[result_row(2, 1, 9, true)]).unwrap();

    store.replace_results(1, &[]).unwrap();
    assert!(store.results_for(1).unwrap().is_empty());
    assert_eq!(store.results_for(2).unwrap().len(), 1);
}
