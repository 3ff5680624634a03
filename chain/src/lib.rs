//! Ledger RPC client for the evote engine.
//!
//! [`ChainClient`] owns the HTTP connection, the deployed contract
//! addresses, and the engine's signing account. It exposes two capability
//! sets behind the [`ChainRpc`] trait:
//!
//! - **reads** — pure queries against contract state; side-effect-free and
//!   freely retriable, run unsynchronized;
//! - **writes** — `submit` / `submit_and_wait`, all funneled through one
//!   serialization point so nonce allocation is strictly ordered.
//!
//! Coordinators depend on [`ChainRpc`], never on the concrete client, so a
//! deterministic double can stand in during tests.

pub mod client;
pub mod error;
pub mod nonce;
pub mod rpc;
pub mod tx;
pub mod types;

pub use client::{ChainClient, ChainClientConfig, ContractAddresses};
pub use error::ChainError;
pub use rpc::ChainRpc;
pub use tx::{MutatingCall, SignedTransaction, TxEnvelope};
pub use types::{
    BallotCandidate, BallotDeployment, CandidateTally, ChainStatus, CommitStatus, DeployElection,
    ElectionInfo, ElectionSummary, IntegrityReport, TxReceipt, VoterInfo,
};
