//! Chain reconciliation queue — deferred ledger writes with retry/backoff.
//!
//! Voter deactivation and reactivation flip the local flag immediately; the
//! matching ledger call is enqueued here instead of fired inline, so the
//! inconsistency window is observable (queue depth, task list) and operable
//! (explicit pump, bounded retries). There is no background loop: callers
//! trigger [`ChainReconciler::run_due`] explicitly.

use std::collections::VecDeque;
use std::sync::Mutex;

use evote_chain::ChainRpc;
use evote_store::VoterStore;
use evote_types::{Timestamp, WalletAddress};

/// A ledger operation awaiting reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOp {
    DeactivateVoter { wallet: WalletAddress, reason: String },
    ReactivateVoter { wallet: WalletAddress },
}

impl ReconcileOp {
    pub fn wallet(&self) -> &WalletAddress {
        match self {
            ReconcileOp::DeactivateVoter { wallet, .. } => wallet,
            ReconcileOp::ReactivateVoter { wallet } => wallet,
        }
    }
}

/// A queued task with its retry state.
#[derive(Clone, Debug)]
pub struct ReconcileTask {
    pub op: ReconcileOp,
    pub attempts: u32,
    pub next_attempt_at: Timestamp,
}

/// Retry policy for queued tasks.
#[derive(Clone, Debug)]
pub struct ReconcilerConfig {
    /// Retries before a task is dropped with a warning.
    pub max_retries: u32,
    /// First retry delay; doubles per attempt.
    pub base_backoff_secs: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_backoff_secs: 30,
        }
    }
}

/// Outcome of one explicit pump of the queue.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub executed: usize,
    pub deferred: usize,
    pub dropped: usize,
}

/// Owned queue of pending ledger operations.
pub struct ChainReconciler {
    queue: Mutex<VecDeque<ReconcileTask>>,
    config: ReconcilerConfig,
}

impl ChainReconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            config,
        }
    }

    /// Enqueue a ledger operation, due immediately.
    pub fn enqueue(&self, op: ReconcileOp, now: Timestamp) {
        let mut queue = self.queue.lock().expect("reconciler queue poisoned");
        queue.push_back(ReconcileTask {
            op,
            attempts: 0,
            next_attempt_at: now,
        });
    }

    /// Number of tasks waiting (due or backing off).
    pub fn pending_count(&self) -> usize {
        self.queue.lock().expect("reconciler queue poisoned").len()
    }

    /// Snapshot of the queued tasks, for inspection.
    pub fn tasks(&self) -> Vec<ReconcileTask> {
        self.queue
            .lock()
            .expect("reconciler queue poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Delay before attempt `attempts + 1`: base × 2^attempts, capped at an
    /// hour.
    fn backoff_secs(&self, attempts: u32) -> u64 {
        let exp = attempts.min(16);
        (self.config.base_backoff_secs.saturating_mul(1u64 << exp)).min(3600)
    }

    /// Execute every task that is due at `now`.
    ///
    /// Successes record the resulting transaction hash on the voter record;
    /// failures are re-queued with exponential backoff until `max_retries`,
    /// then dropped with a warning.
    pub async fn run_due<C, S>(&self, chain: &C, store: &S, now: Timestamp) -> ReconcileReport
    where
        C: ChainRpc,
        S: VoterStore,
    {
        let due: Vec<ReconcileTask> = {
            let mut queue = self.queue.lock().expect("reconciler queue poisoned");
            let mut due = Vec::new();
            let mut rest = VecDeque::new();
            while let Some(task) = queue.pop_front() {
                if task.next_attempt_at <= now {
                    due.push(task);
                } else {
                    rest.push_back(task);
                }
            }
            *queue = rest;
            due
        };

        let mut report = ReconcileReport::default();

        for task in due {
            let result = match &task.op {
                ReconcileOp::DeactivateVoter { wallet, reason } => {
                    chain.deactivate_voter(wallet, reason).await
                }
                ReconcileOp::ReactivateVoter { wallet } => chain.reactivate_voter(wallet).await,
            };

            match result {
                Ok(tx_hash) => {
                    report.executed += 1;
                    tracing::info!(op = ?task.op, %tx_hash, "reconciliation task executed");
                    match store.get_voter(task.op.wallet()) {
                        Ok(mut voter) => {
                            voter.last_tx_hash = Some(tx_hash);
                            if let Err(e) = store.update_voter(&voter) {
                                tracing::warn!(%e, "failed to record reconciliation tx hash");
                            }
                        }
                        Err(e) => {
                            tracing::warn!(%e, "reconciled voter missing from local store")
                        }
                    }
                }
                Err(err) => {
                    let attempts = task.attempts + 1;
                    if attempts > self.config.max_retries {
                        report.dropped += 1;
                        tracing::warn!(
                            op = ?task.op,
                            attempts,
                            %err,
                            "reconciliation task exceeded max retries, dropping"
                        );
                    } else {
                        report.deferred += 1;
                        let delay = self.backoff_secs(attempts - 1);
                        tracing::warn!(
                            op = ?task.op,
                            attempts,
                            retry_in_secs = delay,
                            %err,
                            "reconciliation task failed, deferring"
                        );
                        let mut queue =
                            self.queue.lock().expect("reconciler queue poisoned");
                        queue.push_back(ReconcileTask {
                            op: task.op,
                            attempts,
                            next_attempt_at: now.plus(delay),
                        });
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciler() -> ChainReconciler {
        ChainReconciler::new(ReconcilerConfig {
            max_retries: 3,
            base_backoff_secs: 10,
        })
    }

    fn wallet(n: u8) -> WalletAddress {
        WalletAddress::from_bytes(&[n; 20])
    }

    #[test]
    fn enqueue_is_due_immediately() {
        let r = reconciler();
        r.enqueue(
            ReconcileOp::ReactivateVoter { wallet: wallet(1) },
            Timestamp::new(100),
        );
        assert_eq!(r.pending_count(), 1);
        let task = &r.tasks()[0];
        assert_eq!(task.attempts, 0);
        assert_eq!(task.next_attempt_at, Timestamp::new(100));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let r = reconciler();
        assert_eq!(r.backoff_secs(0), 10);
        assert_eq!(r.backoff_secs(1), 20);
        assert_eq!(r.backoff_secs(2), 40);
    }

    #[test]
    fn backoff_is_capped() {
        let r = reconciler();
        assert_eq!(r.backoff_secs(16), 3600);
        assert_eq!(r.backoff_secs(32), 3600);
    }
}
