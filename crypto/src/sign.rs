//! Ed25519 signing and verification for transaction envelopes.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use evote_types::{PrivateKey, PublicKey, Signature};

/// Sign a message with a private key, returning the signature.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    let sig = signing_key.sign(message);
    Signature(sig.to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &dalek_sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn sign_and_verify() {
        let kp = generate_keypair();
        let msg = b"canonical transaction envelope bytes";
        let sig = sign_message(msg, &kp.private);
        assert!(verify_signature(msg, &sig, &kp.public));
    }

    #[test]
    fn tampered_message_fails() {
        let kp = generate_keypair();
        let sig = sign_message(b"original payload", &kp.private);
        assert!(!verify_signature(b"tampered payload", &sig, &kp.public));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = generate_keypair();
        let kp2 = generate_keypair();
        let sig = sign_message(b"payload", &kp1.private);
        assert!(!verify_signature(b"payload", &sig, &kp2.public));
    }

    #[test]
    fn signature_deterministic_for_fixed_key() {
        let kp = keypair_from_seed(&[99u8; 32]);
        let sig1 = sign_message(b"same bytes", &kp.private);
        let sig2 = sign_message(b"same bytes", &kp.private);
        assert_eq!(sig1.0, sig2.0);
    }

    #[test]
    fn invalid_public_key_rejected() {
        let kp = generate_keypair();
        let sig = sign_message(b"payload", &kp.private);
        let bad_key = PublicKey([0xFF; 32]);
        assert!(!verify_signature(b"payload", &sig, &bad_key));
    }
}
