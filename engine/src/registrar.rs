//! Voter registrar — local registry writes with a best-effort ledger half.
//!
//! Registration is local-first: the raw identity is hashed at this boundary
//! (never persisted), duplicates are rejected before any write, and a failed
//! on-chain registration leaves a retriable local record rather than
//! aborting. Deactivation and reactivation flip the local flag immediately
//! and queue the ledger call on the reconciler.

use std::sync::Arc;

use evote_chain::{ChainRpc, VoterInfo};
use evote_store::{VoterRecord, VoterStore};
use evote_types::{Clock, WalletAddress};

use crate::reconcile::{ChainReconciler, ReconcileOp};
use crate::EngineError;

/// Input for registering a voter.
#[derive(Clone, Debug)]
pub struct NewVoter {
    pub name: String,
    /// Raw external identifier; hashed immediately, never stored.
    pub raw_voter_id: String,
    pub wallet_address: WalletAddress,
    pub constituency_id: u32,
}

/// Result of `register_voter`: the local half always succeeded; `onchain`
/// says whether the ledger half did. On failure the chain error text is
/// carried so the caller can retry via `retry_onchain_registration`.
#[derive(Debug)]
pub struct RegistrationOutcome {
    pub voter: VoterRecord,
    pub onchain: bool,
    pub chain_error: Option<String>,
}

/// A local voter record enriched with the ledger's registry entry.
#[derive(Debug)]
pub struct VoterView {
    pub voter: VoterRecord,
    pub onchain: Option<VoterInfo>,
}

/// Registration statistics, local and ledger-side.
#[derive(Debug)]
pub struct VoterStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub registered_onchain: u64,
    /// Ledger's total registered count; `None` when the ledger is
    /// unreachable.
    pub onchain_total: Option<u64>,
}

pub struct VoterRegistrar<S, C, K> {
    store: Arc<S>,
    chain: Arc<C>,
    clock: Arc<K>,
    reconciler: Arc<ChainReconciler>,
}

impl<S, C, K> VoterRegistrar<S, C, K>
where
    S: VoterStore,
    C: ChainRpc,
    K: Clock,
{
    pub fn new(
        store: Arc<S>,
        chain: Arc<C>,
        clock: Arc<K>,
        reconciler: Arc<ChainReconciler>,
    ) -> Self {
        Self {
            store,
            chain,
            clock,
            reconciler,
        }
    }

    /// Register a voter locally, then attempt on-chain registration.
    ///
    /// Duplicate wallet or duplicate identity rejects before any write. A
    /// ledger failure leaves the local record with
    /// `is_registered_onchain = false` and reports the error for a later
    /// retry.
    pub async fn register_voter(
        &self,
        spec: NewVoter,
    ) -> Result<RegistrationOutcome, EngineError> {
        let identity_hash = evote_crypto::hash_identity(&spec.raw_voter_id);

        if self.store.get_voter(&spec.wallet_address).is_ok() {
            return Err(EngineError::Validation(format!(
                "wallet {} already registered",
                spec.wallet_address
            )));
        }
        if self.store.find_by_identity(&identity_hash)?.is_some() {
            return Err(EngineError::Validation(
                "voter identity already registered".into(),
            ));
        }

        let mut record = VoterRecord {
            name: spec.name,
            wallet_address: spec.wallet_address.clone(),
            identity_hash,
            constituency_id: spec.constituency_id,
            is_active: true,
            is_registered_onchain: false,
            last_tx_hash: None,
            created_at: self.clock.now(),
        };
        self.store.insert_voter(&record)?;

        match self
            .chain
            .register_voter(&spec.wallet_address, &identity_hash, spec.constituency_id)
            .await
        {
            Ok(tx_hash) => {
                record.is_registered_onchain = true;
                record.last_tx_hash = Some(tx_hash);
                self.store.update_voter(&record)?;
                tracing::info!(wallet = %spec.wallet_address, %tx_hash, "voter registered on-chain");
                Ok(RegistrationOutcome {
                    voter: record,
                    onchain: true,
                    chain_error: None,
                })
            }
            Err(err) => {
                // Local registration stands; on-chain can be retried.
                tracing::warn!(wallet = %spec.wallet_address, %err, "on-chain registration failed; left pending");
                Ok(RegistrationOutcome {
                    voter: record,
                    onchain: false,
                    chain_error: Some(err.to_string()),
                })
            }
        }
    }

    /// Retry on-chain registration for a voter whose first attempt failed.
    ///
    /// A voter already marked registered fails with `AlreadyRegistered` and
    /// no submission is issued — this is what keeps retries idempotent at
    /// the business level.
    pub async fn retry_onchain_registration(
        &self,
        wallet: &WalletAddress,
    ) -> Result<VoterRecord, EngineError> {
        let mut record = self
            .store
            .get_voter(wallet)
            .map_err(|e| EngineError::from_lookup(e, format!("voter {wallet}")))?;

        if record.is_registered_onchain {
            return Err(EngineError::AlreadyRegistered(wallet.clone()));
        }

        let tx_hash = self
            .chain
            .register_voter(wallet, &record.identity_hash, record.constituency_id)
            .await?;

        record.is_registered_onchain = true;
        record.last_tx_hash = Some(tx_hash);
        self.store.update_voter(&record)?;
        tracing::info!(%wallet, %tx_hash, "voter registered on-chain after retry");
        Ok(record)
    }

    /// Deactivate a voter. The local flag flips immediately; the ledger
    /// deactivation is queued on the reconciler.
    pub async fn deactivate_voter(
        &self,
        wallet: &WalletAddress,
        reason: &str,
    ) -> Result<VoterRecord, EngineError> {
        let mut record = self
            .store
            .get_voter(wallet)
            .map_err(|e| EngineError::from_lookup(e, format!("voter {wallet}")))?;

        record.is_active = false;
        self.store.update_voter(&record)?;

        self.reconciler.enqueue(
            ReconcileOp::DeactivateVoter {
                wallet: wallet.clone(),
                reason: reason.to_string(),
            },
            self.clock.now(),
        );
        tracing::info!(%wallet, reason, "voter deactivated locally; ledger update queued");
        Ok(record)
    }

    /// Reactivate a voter. The local flag flips immediately; the ledger
    /// reactivation is queued on the reconciler.
    pub async fn reactivate_voter(
        &self,
        wallet: &WalletAddress,
    ) -> Result<VoterRecord, EngineError> {
        let mut record = self
            .store
            .get_voter(wallet)
            .map_err(|e| EngineError::from_lookup(e, format!("voter {wallet}")))?;

        record.is_active = true;
        self.store.update_voter(&record)?;

        self.reconciler.enqueue(
            ReconcileOp::ReactivateVoter {
                wallet: wallet.clone(),
            },
            self.clock.now(),
        );
        tracing::info!(%wallet, "voter reactivated locally; ledger update queued");
        Ok(record)
    }

    /// A voter's local record enriched with the ledger registry entry when
    /// reachable.
    pub async fn get_voter(&self, wallet: &WalletAddress) -> Result<VoterView, EngineError> {
        let record = self
            .store
            .get_voter(wallet)
            .map_err(|e| EngineError::from_lookup(e, format!("voter {wallet}")))?;
        let onchain = self.chain.get_voter_info(wallet).await.ok();
        Ok(VoterView {
            voter: record,
            onchain,
        })
    }

    /// Voters, paged by wallet address.
    pub fn list_voters(
        &self,
        cursor: Option<&WalletAddress>,
        limit: usize,
    ) -> Result<Vec<VoterRecord>, EngineError> {
        Ok(self.store.iter_voters_paged(cursor, limit)?)
    }

    /// Registration statistics. Ledger unavailability degrades the
    /// ledger-side counter to `None` instead of failing the whole call.
    pub async fn stats(&self) -> Result<VoterStats, EngineError> {
        let total = self.store.voter_count()?;
        let active = self.store.active_voter_count()?;
        let registered_onchain = self.store.onchain_registered_count()?;
        let onchain_total = match self.chain.get_total_voters().await {
            Ok(n) => Some(n),
            Err(err) => {
                tracing::warn!(%err, "could not read ledger voter total");
                None
            }
        };
        Ok(VoterStats {
            total,
            active,
            inactive: total - active,
            registered_onchain,
            onchain_total,
        })
    }
}
