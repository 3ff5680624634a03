//! Cryptographic primitives for the evote engine.
//!
//! Keccak-256 digests (identity hashing, commit-reveal digests, transaction
//! hashing) and Ed25519 signing for the engine's ledger submitter account.

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::derive_address;
pub use hash::{commit_digest, hash_identity, hash_transaction, keccak256, keccak256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
