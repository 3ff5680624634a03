//! Ledger client error types.

use thiserror::Error;

/// Failure modes of ledger interaction.
///
/// `Unavailable` (could not reach the RPC endpoint) is deliberately distinct
/// from `Rejected` (the remote end processed the call and refused it); the
/// two demand different handling upstream. `Timeout` means the outcome is
/// unknown — the transaction may still land — so callers must not treat it
/// as a failure when deciding whether to resubmit.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain unavailable: {0}")]
    Unavailable(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("no confirmation within {waited_secs}s")]
    Timeout { waited_secs: u64 },

    #[error("invalid ledger response: {0}")]
    InvalidResponse(String),

    #[error("signing error: {0}")]
    Signing(String),
}

impl ChainError {
    /// Whether this rejection is a nonce conflict, eligible for a single
    /// refetch-and-retry inside the submit path.
    pub fn is_nonce_conflict(&self) -> bool {
        match self {
            ChainError::Rejected(msg) => {
                let lower = msg.to_ascii_lowercase();
                lower.contains("nonce")
            }
            _ => false,
        }
    }
}
