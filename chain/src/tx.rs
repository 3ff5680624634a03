//! Transaction envelope construction and signing.
//!
//! A mutating call is wrapped in a canonical JSON envelope, hashed with
//! Keccak-256, and signed with the engine's Ed25519 submitter key before
//! broadcast. Field order is fixed by struct declaration order, which is
//! what makes the serialized bytes canonical.

use serde::Serialize;

use evote_crypto::{hash::hash_transaction, sign_message};
use evote_types::{KeyPair, Signature, TxHash, WalletAddress};

use crate::ChainError;

/// A state-changing contract call, before nonce assignment and signing.
#[derive(Debug, Clone, Serialize)]
pub struct MutatingCall {
    pub to: WalletAddress,
    pub method: String,
    pub args: serde_json::Value,
}

impl MutatingCall {
    pub fn new(to: WalletAddress, method: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            to,
            method: method.into(),
            args,
        }
    }
}

/// The canonical unsigned transaction envelope.
#[derive(Debug, Clone, Serialize)]
pub struct TxEnvelope {
    pub from: WalletAddress,
    pub to: WalletAddress,
    pub method: String,
    pub args: serde_json::Value,
    pub nonce: u64,
    pub issued_at: u64,
}

impl TxEnvelope {
    pub fn for_call(
        from: WalletAddress,
        call: &MutatingCall,
        nonce: u64,
        issued_at: u64,
    ) -> Self {
        Self {
            from,
            to: call.to.clone(),
            method: call.method.clone(),
            args: call.args.clone(),
            nonce,
            issued_at,
        }
    }

    /// The canonical byte encoding that is hashed and signed.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, ChainError> {
        serde_json::to_vec(self).map_err(|e| ChainError::Signing(format!("encode envelope: {e}")))
    }

    /// Hash and sign this envelope with the submitter key.
    pub fn sign(self, keys: &KeyPair) -> Result<SignedTransaction, ChainError> {
        let bytes = self.canonical_bytes()?;
        let hash = hash_transaction(&bytes);
        let signature = sign_message(&bytes, &keys.private);
        Ok(SignedTransaction {
            envelope: self,
            hash,
            signature,
        })
    }
}

/// A fully signed transaction, ready for broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub envelope: TxEnvelope,
    pub hash: TxHash,
    pub signature: Signature,
}
