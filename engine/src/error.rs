//! Engine error taxonomy.
//!
//! Callers are forced to observe partial outcomes through typed results;
//! nothing here is a catch-all. Ledger failures during local-first flows do
//! not surface as errors at all — they degrade the operation to "local
//! succeeded, ledger pending" (see the outcome structs in `election` and
//! `registrar`).

use thiserror::Error;

use evote_chain::ChainError;
use evote_store::StoreError;
use evote_types::WalletAddress;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad input shape or ordering, rejected before any write.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A vote receipt already exists for this (election, voter) pair.
    #[error("duplicate receipt: voter {voter} already committed in election {election_id}")]
    DuplicateReceipt {
        election_id: u64,
        voter: WalletAddress,
    },

    /// No-op guard: the voter's on-chain registration is already confirmed.
    #[error("voter {0} is already registered on-chain")]
    AlreadyRegistered(WalletAddress),

    /// No-op guard: the receipt has already been revealed; timestamps are
    /// never overwritten.
    #[error("receipt for voter {voter} in election {election_id} is already revealed")]
    AlreadyRevealed {
        election_id: u64,
        voter: WalletAddress,
    },

    /// No-op guard: the election already has a deployed ballot.
    #[error("election {0} already has a deployed ballot")]
    AlreadyDeployed(u64),

    /// The operation requires a deployed ballot contract.
    #[error("election {0} has no deployed ballot")]
    NotDeployed(u64),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Map a store lookup failure to the engine's `NotFound`, keeping other
    /// store failures as aborts.
    pub(crate) fn from_lookup(e: StoreError, what: impl Into<String>) -> Self {
        match e {
            StoreError::NotFound(_) => EngineError::NotFound(what.into()),
            other => EngineError::Store(other),
        }
    }
}
