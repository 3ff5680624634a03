//! Fundamental types for the evote engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: wallet addresses, digest newtypes, timestamps, election state
//! enums, and the signing key material.

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod state;
pub mod time;

pub use address::WalletAddress;
pub use error::CoreError;
pub use hash::{IdentityHash, ReceiptHash, TxHash};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use state::{ElectionStatus, ElectionType, VotePhase};
pub use time::{Clock, SystemClock, Timestamp};
