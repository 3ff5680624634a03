//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use evote_chain::{ChainClientConfig, ContractAddresses};
use evote_crypto::keypair_from_private;
use evote_types::{KeyPair, PrivateKey, WalletAddress};

use crate::reconcile::ReconcilerConfig;
use crate::EngineError;

/// Configuration for the election engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ledger node RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Hex-encoded Ed25519 private key of the submitter account.
    #[serde(default)]
    pub submitter_key: String,

    /// Deployed voter registry contract.
    #[serde(default)]
    pub voter_registry_address: String,

    /// Deployed election factory contract.
    #[serde(default)]
    pub election_factory_address: String,

    /// Deployed vote verifier contract.
    #[serde(default)]
    pub vote_verifier_address: String,

    /// Data directory for the local store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Bound on one transaction broadcast; elapsing is reported as a
    /// timeout, not a failure.
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    #[serde(default = "default_receipt_poll_interval")]
    pub receipt_poll_interval_ms: u64,

    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout_secs: u64,

    /// Retries before a queued ledger reconciliation task is dropped.
    #[serde(default = "default_reconcile_max_retries")]
    pub reconcile_max_retries: u32,

    /// First retry delay; doubles per attempt.
    #[serde(default = "default_reconcile_backoff")]
    pub reconcile_base_backoff_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./evote_data")
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_submit_timeout() -> u64 {
    30
}

fn default_receipt_poll_interval() -> u64 {
    500
}

fn default_receipt_timeout() -> u64 {
    60
}

fn default_reconcile_max_retries() -> u32 {
    5
}

fn default_reconcile_backoff() -> u64 {
    30
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("EngineConfig is always serializable to TOML")
    }

    /// The chain client tunables carried by this config.
    pub fn chain_client_config(&self) -> ChainClientConfig {
        ChainClientConfig {
            rpc_url: self.rpc_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            submit_timeout_secs: self.submit_timeout_secs,
            receipt_poll_interval_ms: self.receipt_poll_interval_ms,
            receipt_timeout_secs: self.receipt_timeout_secs,
        }
    }

    /// Parse the configured contract addresses.
    pub fn contract_addresses(&self) -> Result<ContractAddresses, EngineError> {
        let parse = |label: &str, raw: &str| {
            WalletAddress::parse(raw)
                .map_err(|e| EngineError::Config(format!("{label}: {e}")))
        };
        Ok(ContractAddresses {
            voter_registry: parse("voter_registry_address", &self.voter_registry_address)?,
            election_factory: parse("election_factory_address", &self.election_factory_address)?,
            vote_verifier: parse("vote_verifier_address", &self.vote_verifier_address)?,
        })
    }

    /// Load the submitter key pair from the configured hex key.
    pub fn submitter_keypair(&self) -> Result<KeyPair, EngineError> {
        let private = PrivateKey::from_hex(&self.submitter_key)
            .map_err(|e| EngineError::Config(format!("submitter_key: {e}")))?;
        Ok(keypair_from_private(private))
    }

    /// The reconciler retry policy carried by this config.
    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            max_retries: self.reconcile_max_retries,
            base_backoff_secs: self.reconcile_base_backoff_secs,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            submitter_key: String::new(),
            voter_registry_address: String::new(),
            election_factory_address: String::new(),
            vote_verifier_address: String::new(),
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            submit_timeout_secs: default_submit_timeout(),
            receipt_poll_interval_ms: default_receipt_poll_interval(),
            receipt_timeout_secs: default_receipt_timeout(),
            reconcile_max_retries: default_reconcile_max_retries(),
            reconcile_base_backoff_secs: default_reconcile_backoff(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
