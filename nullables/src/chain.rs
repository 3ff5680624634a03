//! Nullable chain — a deterministic, programmable ledger double.
//!
//! Records every write for assertions, serves reads from fixtures, and can
//! be scripted to fail: queue a `ChainError` to reject the next write, or
//! flip the read switch to simulate an unreachable node.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use evote_chain::{
    BallotCandidate, BallotDeployment, CandidateTally, ChainError, ChainRpc, ChainStatus,
    CommitStatus, DeployElection, ElectionInfo, ElectionSummary, IntegrityReport, VoterInfo,
};
use evote_types::{IdentityHash, ReceiptHash, TxHash, WalletAddress};

/// One recorded write, for assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub target: String,
}

/// A test ledger.
pub struct NullChain {
    election_infos: Mutex<HashMap<String, ElectionInfo>>,
    ballot_candidates: Mutex<HashMap<String, Vec<BallotCandidate>>>,
    ballot_results: Mutex<HashMap<String, Vec<CandidateTally>>>,
    voter_infos: Mutex<HashMap<String, VoterInfo>>,
    eligible: Mutex<HashSet<String>>,
    commit_statuses: Mutex<HashMap<(String, String), CommitStatus>>,
    valid_receipts: Mutex<HashSet<(String, String, ReceiptHash)>>,
    total_voters: Mutex<u64>,
    /// Errors consumed, in order, by upcoming writes.
    fail_next_writes: Mutex<VecDeque<ChainError>>,
    /// When set, every read fails with `Unavailable` carrying this message.
    reads_down: Mutex<Option<String>>,
    /// Scripted deployments consumed by `deploy_election`.
    queued_deployments: Mutex<VecDeque<BallotDeployment>>,
    submitted: Mutex<Vec<RecordedCall>>,
    counter: AtomicU64,
}

impl NullChain {
    pub fn new() -> Self {
        Self {
            election_infos: Mutex::new(HashMap::new()),
            ballot_candidates: Mutex::new(HashMap::new()),
            ballot_results: Mutex::new(HashMap::new()),
            voter_infos: Mutex::new(HashMap::new()),
            eligible: Mutex::new(HashSet::new()),
            commit_statuses: Mutex::new(HashMap::new()),
            valid_receipts: Mutex::new(HashSet::new()),
            total_voters: Mutex::new(0),
            fail_next_writes: Mutex::new(VecDeque::new()),
            reads_down: Mutex::new(None),
            queued_deployments: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            counter: AtomicU64::new(1),
        }
    }

    // ── Scripting ───────────────────────────────────────────────────────

    /// Queue an error for the next write; writes consume queued errors in
    /// order before executing.
    pub fn fail_next_write(&self, err: ChainError) {
        self.fail_next_writes.lock().unwrap().push_back(err);
    }

    /// Make every read fail with `ChainUnavailable` until restored.
    pub fn take_reads_down(&self, message: impl Into<String>) {
        *self.reads_down.lock().unwrap() = Some(message.into());
    }

    /// Restore read availability.
    pub fn restore_reads(&self) {
        *self.reads_down.lock().unwrap() = None;
    }

    /// Script the outcome of the next `deploy_election`.
    pub fn queue_deployment(&self, onchain_id: u64, ballot_address: WalletAddress) {
        self.queued_deployments
            .lock()
            .unwrap()
            .push_back(BallotDeployment {
                onchain_id,
                ballot_address,
                tx_hash: self.next_tx_hash(),
            });
    }

    pub fn set_election_info(&self, ballot: &WalletAddress, info: ElectionInfo) {
        self.election_infos
            .lock()
            .unwrap()
            .insert(ballot.as_str().to_string(), info);
    }

    pub fn set_ballot_candidates(&self, ballot: &WalletAddress, rows: Vec<BallotCandidate>) {
        self.ballot_candidates
            .lock()
            .unwrap()
            .insert(ballot.as_str().to_string(), rows);
    }

    pub fn set_ballot_results(&self, ballot: &WalletAddress, rows: Vec<CandidateTally>) {
        self.ballot_results
            .lock()
            .unwrap()
            .insert(ballot.as_str().to_string(), rows);
    }

    pub fn set_voter_info(&self, wallet: &WalletAddress, info: VoterInfo) {
        self.voter_infos
            .lock()
            .unwrap()
            .insert(wallet.as_str().to_string(), info);
    }

    pub fn set_eligible(&self, wallet: &WalletAddress, eligible: bool) {
        let mut set = self.eligible.lock().unwrap();
        if eligible {
            set.insert(wallet.as_str().to_string());
        } else {
            set.remove(wallet.as_str());
        }
    }

    pub fn set_commit_status(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
        status: CommitStatus,
    ) {
        self.commit_statuses.lock().unwrap().insert(
            (ballot.as_str().to_string(), voter.as_str().to_string()),
            status,
        );
    }

    pub fn add_valid_receipt(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
        receipt_hash: ReceiptHash,
    ) {
        self.valid_receipts.lock().unwrap().insert((
            ballot.as_str().to_string(),
            voter.as_str().to_string(),
            receipt_hash,
        ));
    }

    pub fn set_total_voters(&self, total: u64) {
        *self.total_voters.lock().unwrap() = total;
    }

    /// Every write recorded so far, oldest first.
    pub fn submitted_calls(&self) -> Vec<RecordedCall> {
        self.submitted.lock().unwrap().clone()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn next_tx_hash(&self) -> TxHash {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        TxHash::new(bytes)
    }

    fn check_reads(&self) -> Result<(), ChainError> {
        if let Some(msg) = self.reads_down.lock().unwrap().clone() {
            return Err(ChainError::Unavailable(msg));
        }
        Ok(())
    }

    fn take_write_failure(&self) -> Option<ChainError> {
        self.fail_next_writes.lock().unwrap().pop_front()
    }

    fn record(&self, method: &str, target: &WalletAddress) {
        self.submitted.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            target: target.as_str().to_string(),
        });
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainRpc for NullChain {
    async fn chain_status(&self) -> Result<ChainStatus, ChainError> {
        self.check_reads()?;
        Ok(ChainStatus {
            chain_id: 1337,
            block_number: self.counter.load(Ordering::SeqCst),
        })
    }

    async fn get_election_info(
        &self,
        ballot: &WalletAddress,
    ) -> Result<ElectionInfo, ChainError> {
        self.check_reads()?;
        self.election_infos
            .lock()
            .unwrap()
            .get(ballot.as_str())
            .cloned()
            .ok_or_else(|| ChainError::Rejected(format!("unknown ballot {ballot}")))
    }

    async fn get_ballot_candidates(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Vec<BallotCandidate>, ChainError> {
        self.check_reads()?;
        Ok(self
            .ballot_candidates
            .lock()
            .unwrap()
            .get(ballot.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn get_ballot_results(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Vec<CandidateTally>, ChainError> {
        self.check_reads()?;
        self.ballot_results
            .lock()
            .unwrap()
            .get(ballot.as_str())
            .cloned()
            .ok_or_else(|| ChainError::Rejected(format!("unknown ballot {ballot}")))
    }

    async fn get_voter_info(&self, wallet: &WalletAddress) -> Result<VoterInfo, ChainError> {
        self.check_reads()?;
        Ok(self
            .voter_infos
            .lock()
            .unwrap()
            .get(wallet.as_str())
            .cloned()
            .unwrap_or(VoterInfo {
                registered: false,
                active: false,
                constituency_id: 0,
            }))
    }

    async fn is_voter_eligible(&self, wallet: &WalletAddress) -> Result<bool, ChainError> {
        self.check_reads()?;
        Ok(self.eligible.lock().unwrap().contains(wallet.as_str()))
    }

    async fn get_voter_commit_status(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<CommitStatus, ChainError> {
        self.check_reads()?;
        Ok(self
            .commit_statuses
            .lock()
            .unwrap()
            .get(&(ballot.as_str().to_string(), voter.as_str().to_string()))
            .cloned()
            .unwrap_or(CommitStatus {
                has_committed: false,
                has_revealed: false,
            }))
    }

    async fn verify_receipt(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
        receipt_hash: &ReceiptHash,
    ) -> Result<bool, ChainError> {
        self.check_reads()?;
        Ok(self.valid_receipts.lock().unwrap().contains(&(
            ballot.as_str().to_string(),
            voter.as_str().to_string(),
            *receipt_hash,
        )))
    }

    async fn verify_election_integrity(
        &self,
        ballot: &WalletAddress,
    ) -> Result<IntegrityReport, ChainError> {
        self.check_reads()?;
        let info = self.get_election_info(ballot).await?;
        Ok(IntegrityReport {
            total_commits: info.total_commits,
            total_reveals: info.total_reveals,
            is_consistent: info.total_reveals <= info.total_commits,
        })
    }

    async fn get_election_summary(
        &self,
        ballot: &WalletAddress,
    ) -> Result<ElectionSummary, ChainError> {
        self.check_reads()?;
        let info = self.get_election_info(ballot).await?;
        Ok(ElectionSummary {
            phase: info.phase,
            total_commits: info.total_commits,
            total_reveals: info.total_reveals,
            is_finalized: info.is_finalized,
        })
    }

    async fn did_voter_participate(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<bool, ChainError> {
        let status = self.get_voter_commit_status(ballot, voter).await?;
        Ok(status.has_committed)
    }

    async fn get_total_voters(&self) -> Result<u64, ChainError> {
        self.check_reads()?;
        Ok(*self.total_voters.lock().unwrap())
    }

    async fn register_voter(
        &self,
        wallet: &WalletAddress,
        _identity_hash: &IdentityHash,
        constituency_id: u32,
    ) -> Result<TxHash, ChainError> {
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        self.record("registerVoter", wallet);
        self.set_voter_info(
            wallet,
            VoterInfo {
                registered: true,
                active: true,
                constituency_id,
            },
        );
        self.set_eligible(wallet, true);
        *self.total_voters.lock().unwrap() += 1;
        Ok(self.next_tx_hash())
    }

    async fn deploy_election(
        &self,
        params: &DeployElection,
    ) -> Result<BallotDeployment, ChainError> {
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        let deployment = self
            .queued_deployments
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst);
                let mut bytes = [0u8; 20];
                bytes[12..].copy_from_slice(&n.to_be_bytes());
                BallotDeployment {
                    onchain_id: n,
                    ballot_address: WalletAddress::from_bytes(&bytes),
                    tx_hash: self.next_tx_hash(),
                }
            });
        self.record("createElection", &deployment.ballot_address);
        // A fresh ballot starts in the commit phase with empty counters.
        self.set_election_info(
            &deployment.ballot_address,
            ElectionInfo {
                total_commits: 0,
                total_reveals: 0,
                phase: "commit".to_string(),
                is_finalized: false,
                is_cancelled: false,
            },
        );
        self.set_ballot_candidates(
            &deployment.ballot_address,
            params
                .candidate_names
                .iter()
                .zip(params.candidate_parties.iter())
                .enumerate()
                .map(|(idx, (name, party))| BallotCandidate {
                    id: idx as u64 + 1,
                    name: name.clone(),
                    party: party.clone(),
                })
                .collect(),
        );
        Ok(deployment)
    }

    async fn cancel_election(
        &self,
        ballot: &WalletAddress,
        _reason: &str,
    ) -> Result<TxHash, ChainError> {
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        self.record("cancelElection", ballot);
        if let Some(info) = self.election_infos.lock().unwrap().get_mut(ballot.as_str()) {
            info.is_cancelled = true;
        }
        Ok(self.next_tx_hash())
    }

    async fn deactivate_voter(
        &self,
        wallet: &WalletAddress,
        _reason: &str,
    ) -> Result<TxHash, ChainError> {
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        self.record("deactivateVoter", wallet);
        self.set_eligible(wallet, false);
        if let Some(info) = self.voter_infos.lock().unwrap().get_mut(wallet.as_str()) {
            info.active = false;
        }
        Ok(self.next_tx_hash())
    }

    async fn reactivate_voter(&self, wallet: &WalletAddress) -> Result<TxHash, ChainError> {
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        self.record("reactivateVoter", wallet);
        self.set_eligible(wallet, true);
        if let Some(info) = self.voter_infos.lock().unwrap().get_mut(wallet.as_str()) {
            info.active = true;
        }
        Ok(self.next_tx_hash())
    }
}
