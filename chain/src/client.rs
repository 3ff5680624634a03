//! HTTP client for the ledger node's JSON-RPC interface.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use evote_crypto::derive_address;
use evote_types::{IdentityHash, KeyPair, ReceiptHash, Timestamp, TxHash, WalletAddress};

use crate::nonce::NonceManager;
use crate::rpc::ChainRpc;
use crate::tx::{MutatingCall, TxEnvelope};
use crate::types::{
    BallotCandidate, BallotDeployment, CandidateTally, ChainStatus, CommitStatus, DeployElection,
    ElectionInfo, ElectionSummary, IntegrityReport, TxReceipt, VoterInfo,
};
use crate::ChainError;

/// Addresses of the deployed system contracts.
#[derive(Debug, Clone)]
pub struct ContractAddresses {
    pub voter_registry: WalletAddress,
    pub election_factory: WalletAddress,
    pub vote_verifier: WalletAddress,
}

/// Tunables for the RPC connection and the write path.
#[derive(Debug, Clone)]
pub struct ChainClientConfig {
    pub rpc_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Bound on one broadcast attempt; elapsing yields `Timeout`, not failure.
    pub submit_timeout_secs: u64,
    pub receipt_poll_interval_ms: u64,
    pub receipt_timeout_secs: u64,
}

impl Default for ChainClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            submit_timeout_secs: 30,
            receipt_poll_interval_ms: 500,
            receipt_timeout_secs: 60,
        }
    }
}

/// Client for the ledger node.
///
/// Owns the RPC connection, the contract handles, and the signing account.
/// All state-changing calls pass through [`ChainClient::submit`], which
/// serializes nonce allocation; reads run unsynchronized.
pub struct ChainClient {
    http: reqwest::Client,
    rpc_url: String,
    keys: KeyPair,
    sender: WalletAddress,
    contracts: ContractAddresses,
    nonce: NonceManager,
    submit_timeout: Duration,
    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

impl ChainClient {
    /// Create a client for the given node, signing account, and contracts.
    pub fn connect(
        config: ChainClientConfig,
        keys: KeyPair,
        contracts: ContractAddresses,
    ) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ChainError::Unavailable(format!("failed to create HTTP client: {e}")))?;

        let sender = derive_address(&keys.public);

        Ok(Self {
            http,
            rpc_url: config.rpc_url,
            keys,
            sender,
            contracts,
            nonce: NonceManager::new(),
            submit_timeout: Duration::from_secs(config.submit_timeout_secs),
            receipt_poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
        })
    }

    /// The address of the engine's signing account.
    pub fn sender(&self) -> &WalletAddress {
        &self.sender
    }

    // ── Transport ────────────────────────────────────────────────────────

    /// Send an action-style RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| ChainError::InvalidResponse("params must be a JSON object".into()))?
            .insert("action".to_string(), json!(action));

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Unavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ChainError::Unavailable(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        // The remote error text is carried verbatim, never swallowed.
        if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
            return Err(ChainError::Rejected(err.to_string()));
        }

        Ok(value.get("result").cloned().unwrap_or(value))
    }

    fn parse<T: serde::de::DeserializeOwned>(
        &self,
        value: serde_json::Value,
        what: &str,
    ) -> Result<T, ChainError> {
        serde_json::from_value(value)
            .map_err(|e| ChainError::InvalidResponse(format!("invalid {what} response: {e}")))
    }

    // ── Write path ───────────────────────────────────────────────────────

    async fn fetch_nonce(&self) -> Result<u64, ChainError> {
        #[derive(Deserialize)]
        struct NonceResult {
            nonce: u64,
        }
        let result = self
            .rpc_call("account_nonce", json!({ "account": self.sender }))
            .await?;
        let parsed: NonceResult = self.parse(result, "account_nonce")?;
        Ok(parsed.nonce)
    }

    /// Build, sign, and broadcast one transaction with the given nonce,
    /// bounded by the submit timeout.
    async fn broadcast(&self, call: &MutatingCall, nonce: u64) -> Result<TxHash, ChainError> {
        let envelope =
            TxEnvelope::for_call(self.sender.clone(), call, nonce, Timestamp::now().as_secs());
        let signed = envelope.sign(&self.keys)?;
        let local_hash = signed.hash;

        #[derive(Deserialize)]
        struct SubmitResult {
            #[serde(default)]
            hash: Option<TxHash>,
            accepted: bool,
            #[serde(default)]
            detail: Option<String>,
        }

        let fut = self.rpc_call("submit_tx", json!({ "tx": signed }));
        let result = match tokio::time::timeout(self.submit_timeout, fut).await {
            Ok(r) => r?,
            Err(_) => {
                // The broadcast may still have gone out; outcome unknown.
                return Err(ChainError::Timeout {
                    waited_secs: self.submit_timeout.as_secs(),
                });
            }
        };

        let parsed: SubmitResult = self.parse(result, "submit_tx")?;
        if !parsed.accepted {
            return Err(ChainError::Rejected(
                parsed.detail.unwrap_or_else(|| "transaction refused".to_string()),
            ));
        }
        Ok(parsed.hash.unwrap_or(local_hash))
    }

    /// Submit a state-changing call. Returns as soon as the node accepts the
    /// broadcast; use [`ChainClient::submit_and_wait`] when the receipt is
    /// needed.
    ///
    /// The nonce guard is held for the whole fetch → build → sign →
    /// broadcast sequence. On a nonce-conflict rejection the nonce is
    /// refetched and the call retried exactly once; any other failure
    /// invalidates the cached nonce so the next submission re-syncs instead
    /// of stranding a slot.
    pub async fn submit(&self, call: MutatingCall) -> Result<TxHash, ChainError> {
        let mut guard = self.nonce.lock().await;
        let nonce = match *guard {
            Some(n) => n,
            None => self.fetch_nonce().await?,
        };

        match self.broadcast(&call, nonce).await {
            Ok(hash) => {
                *guard = Some(nonce + 1);
                tracing::debug!(%hash, nonce, method = %call.method, "transaction accepted");
                Ok(hash)
            }
            Err(err) if err.is_nonce_conflict() => {
                tracing::warn!(%err, "nonce conflict, refetching and retrying once");
                let fresh = self.fetch_nonce().await?;
                match self.broadcast(&call, fresh).await {
                    Ok(hash) => {
                        *guard = Some(fresh + 1);
                        Ok(hash)
                    }
                    Err(e) => {
                        *guard = None;
                        Err(e)
                    }
                }
            }
            Err(e) => {
                *guard = None;
                Err(e)
            }
        }
    }

    /// Submit and block until the transaction's receipt lands (or the
    /// receipt wait times out).
    pub async fn submit_and_wait(&self, call: MutatingCall) -> Result<TxReceipt, ChainError> {
        let hash = self.submit(call).await?;
        self.wait_for_receipt(&hash).await
    }

    /// Poll for a transaction receipt at the configured interval, up to the
    /// configured bound. A reverted receipt is a rejection carrying the
    /// revert reason.
    pub async fn wait_for_receipt(&self, hash: &TxHash) -> Result<TxReceipt, ChainError> {
        let deadline = tokio::time::Instant::now() + self.receipt_timeout;
        loop {
            let result = self.rpc_call("tx_receipt", json!({ "hash": hash })).await?;
            let found = result
                .get("found")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if found {
                let receipt: TxReceipt = self.parse(result, "tx_receipt")?;
                if !receipt.is_confirmed() {
                    return Err(ChainError::Rejected(
                        receipt
                            .revert_reason
                            .unwrap_or_else(|| "transaction reverted".to_string()),
                    ));
                }
                return Ok(receipt);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ChainError::Timeout {
                    waited_secs: self.receipt_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}

// ── Typed reads and write wrappers ──────────────────────────────────────

impl ChainRpc for ChainClient {
    async fn chain_status(&self) -> Result<ChainStatus, ChainError> {
        let result = self.rpc_call("chain_status", json!({})).await?;
        self.parse(result, "chain_status")
    }

    async fn get_election_info(
        &self,
        ballot: &WalletAddress,
    ) -> Result<ElectionInfo, ChainError> {
        let result = self
            .rpc_call("election_info", json!({ "ballot": ballot }))
            .await?;
        self.parse(result, "election_info")
    }

    async fn get_ballot_candidates(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Vec<BallotCandidate>, ChainError> {
        #[derive(Deserialize)]
        struct Wrapper {
            candidates: Vec<BallotCandidate>,
        }
        let result = self
            .rpc_call("ballot_candidates", json!({ "ballot": ballot }))
            .await?;
        let parsed: Wrapper = self.parse(result, "ballot_candidates")?;
        Ok(parsed.candidates)
    }

    async fn get_ballot_results(
        &self,
        ballot: &WalletAddress,
    ) -> Result<Vec<CandidateTally>, ChainError> {
        #[derive(Deserialize)]
        struct Wrapper {
            results: Vec<CandidateTally>,
        }
        let result = self
            .rpc_call("ballot_results", json!({ "ballot": ballot }))
            .await?;
        let parsed: Wrapper = self.parse(result, "ballot_results")?;
        Ok(parsed.results)
    }

    async fn get_voter_info(&self, wallet: &WalletAddress) -> Result<VoterInfo, ChainError> {
        let result = self
            .rpc_call(
                "voter_info",
                json!({ "registry": self.contracts.voter_registry, "wallet": wallet }),
            )
            .await?;
        self.parse(result, "voter_info")
    }

    async fn is_voter_eligible(&self, wallet: &WalletAddress) -> Result<bool, ChainError> {
        #[derive(Deserialize)]
        struct Wrapper {
            eligible: bool,
        }
        let result = self
            .rpc_call(
                "voter_eligible",
                json!({ "registry": self.contracts.voter_registry, "wallet": wallet }),
            )
            .await?;
        let parsed: Wrapper = self.parse(result, "voter_eligible")?;
        Ok(parsed.eligible)
    }

    async fn get_voter_commit_status(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<CommitStatus, ChainError> {
        let result = self
            .rpc_call(
                "voter_commit_status",
                json!({ "ballot": ballot, "voter": voter }),
            )
            .await?;
        self.parse(result, "voter_commit_status")
    }

    async fn verify_receipt(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
        receipt_hash: &ReceiptHash,
    ) -> Result<bool, ChainError> {
        #[derive(Deserialize)]
        struct Wrapper {
            valid: bool,
        }
        let result = self
            .rpc_call(
                "verify_receipt",
                json!({ "ballot": ballot, "voter": voter, "receipt_hash": receipt_hash }),
            )
            .await?;
        let parsed: Wrapper = self.parse(result, "verify_receipt")?;
        Ok(parsed.valid)
    }

    async fn verify_election_integrity(
        &self,
        ballot: &WalletAddress,
    ) -> Result<IntegrityReport, ChainError> {
        let result = self
            .rpc_call(
                "election_integrity",
                json!({ "verifier": self.contracts.vote_verifier, "ballot": ballot }),
            )
            .await?;
        self.parse(result, "election_integrity")
    }

    async fn get_election_summary(
        &self,
        ballot: &WalletAddress,
    ) -> Result<ElectionSummary, ChainError> {
        let result = self
            .rpc_call(
                "election_summary",
                json!({ "verifier": self.contracts.vote_verifier, "ballot": ballot }),
            )
            .await?;
        self.parse(result, "election_summary")
    }

    async fn did_voter_participate(
        &self,
        ballot: &WalletAddress,
        voter: &WalletAddress,
    ) -> Result<bool, ChainError> {
        #[derive(Deserialize)]
        struct Wrapper {
            participated: bool,
        }
        let result = self
            .rpc_call(
                "did_participate",
                json!({
                    "verifier": self.contracts.vote_verifier,
                    "ballot": ballot,
                    "voter": voter
                }),
            )
            .await?;
        let parsed: Wrapper = self.parse(result, "did_participate")?;
        Ok(parsed.participated)
    }

    async fn get_total_voters(&self) -> Result<u64, ChainError> {
        #[derive(Deserialize)]
        struct Wrapper {
            total: u64,
        }
        let result = self
            .rpc_call(
                "total_voters",
                json!({ "registry": self.contracts.voter_registry }),
            )
            .await?;
        let parsed: Wrapper = self.parse(result, "total_voters")?;
        Ok(parsed.total)
    }

    async fn register_voter(
        &self,
        wallet: &WalletAddress,
        identity_hash: &IdentityHash,
        constituency_id: u32,
    ) -> Result<TxHash, ChainError> {
        // Registration must confirm: the local record's on-chain flag is
        // only set against a landed transaction.
        let call = MutatingCall::new(
            self.contracts.voter_registry.clone(),
            "registerVoter",
            json!({
                "wallet": wallet,
                "identity_hash": identity_hash,
                "constituency_id": constituency_id
            }),
        );
        let receipt = self.submit_and_wait(call).await?;
        Ok(receipt.tx_hash)
    }

    async fn deploy_election(
        &self,
        params: &DeployElection,
    ) -> Result<BallotDeployment, ChainError> {
        let call = MutatingCall::new(
            self.contracts.election_factory.clone(),
            "createElection",
            serde_json::to_value(params)
                .map_err(|e| ChainError::Signing(format!("encode deployment params: {e}")))?,
        );
        let receipt = self.submit_and_wait(call).await?;
        let ballot_address = receipt.contract_address.clone().ok_or_else(|| {
            ChainError::InvalidResponse("deployment receipt missing contract address".into())
        })?;
        let onchain_id = receipt.onchain_id.ok_or_else(|| {
            ChainError::InvalidResponse("deployment receipt missing election id".into())
        })?;
        tracing::info!(%ballot_address, onchain_id, "ballot contract deployed");
        Ok(BallotDeployment {
            onchain_id,
            ballot_address,
            tx_hash: receipt.tx_hash,
        })
    }

    async fn cancel_election(
        &self,
        ballot: &WalletAddress,
        reason: &str,
    ) -> Result<TxHash, ChainError> {
        // Cancellation is ledger-first: the caller only flips local state on
        // a confirmed receipt.
        let call = MutatingCall::new(
            ballot.clone(),
            "cancelElection",
            json!({ "reason": reason }),
        );
        let receipt = self.submit_and_wait(call).await?;
        Ok(receipt.tx_hash)
    }

    async fn deactivate_voter(
        &self,
        wallet: &WalletAddress,
        reason: &str,
    ) -> Result<TxHash, ChainError> {
        let call = MutatingCall::new(
            self.contracts.voter_registry.clone(),
            "deactivateVoter",
            json!({ "wallet": wallet, "reason": reason }),
        );
        self.submit(call).await
    }

    async fn reactivate_voter(&self, wallet: &WalletAddress) -> Result<TxHash, ChainError> {
        let call = MutatingCall::new(
            self.contracts.voter_registry.clone(),
            "reactivateVoter",
            json!({ "wallet": wallet }),
        );
        self.submit(call).await
    }
}
