//! Shared error type for type-level construction failures.

use thiserror::Error;

/// Errors raised while constructing or parsing core types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid 32-byte digest: {0}")]
    InvalidDigest(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),
}
