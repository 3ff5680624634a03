//! Keccak-256 hashing for identities, commit digests, and transactions.

use sha3::{Digest, Keccak256};

use evote_types::{IdentityHash, ReceiptHash, TxHash};

/// Compute a Keccak-256 hash of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn keccak256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a raw external voter identifier into its stored digest.
///
/// The raw identifier must never be persisted or logged; only this digest is.
pub fn hash_identity(raw_identifier: &str) -> IdentityHash {
    IdentityHash::new(keccak256(raw_identifier.as_bytes()))
}

/// Compute the commit-reveal digest for a vote:
/// `keccak256(uint256(candidate_id) ++ bytes32(secret))`, matching the
/// ballot contract's packed encoding.
pub fn commit_digest(candidate_id: u64, secret: &[u8; 32]) -> ReceiptHash {
    let mut id_word = [0u8; 32];
    id_word[24..].copy_from_slice(&candidate_id.to_be_bytes());
    ReceiptHash::new(keccak256_multi(&[&id_word, secret]))
}

/// Hash a serialized transaction envelope to produce its `TxHash`.
pub fn hash_transaction(tx_bytes: &[u8]) -> TxHash {
    TxHash::new(keccak256(tx_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keccak_deterministic() {
        let h1 = keccak256(b"voter-id-819");
        let h2 = keccak256(b"voter-id-819");
        assert_eq!(h1, h2);
    }

    #[test]
    fn keccak_different_inputs() {
        assert_ne!(keccak256(b"hello"), keccak256(b"world"));
    }

    #[test]
    fn keccak_empty_known_vector() {
        // keccak256("") from the reference implementation.
        let h = keccak256(b"");
        assert_eq!(
            hex::encode(h),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn keccak_multi_equivalent() {
        let single = keccak256(b"helloworld");
        let multi = keccak256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn identity_hash_is_one_way_rendering() {
        let h = hash_identity("NID-4471-X");
        let rendered = h.to_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 66);
        assert!(!rendered.contains("NID"));
    }

    #[test]
    fn commit_digest_depends_on_candidate_and_secret() {
        let secret_a = [0x11u8; 32];
        let secret_b = [0x22u8; 32];
        assert_eq!(commit_digest(1, &secret_a), commit_digest(1, &secret_a));
        assert_ne!(commit_digest(1, &secret_a), commit_digest(2, &secret_a));
        assert_ne!(commit_digest(1, &secret_a), commit_digest(1, &secret_b));
    }

    #[test]
    fn commit_digest_pads_candidate_id_to_word() {
        // Packed encoding is the 32-byte big-endian id followed by the secret.
        let secret = [0xABu8; 32];
        let mut word = [0u8; 32];
        word[31] = 7;
        let expected = keccak256_multi(&[&word, &secret]);
        assert_eq!(commit_digest(7, &secret), ReceiptHash::new(expected));
    }

    proptest! {
        /// Distinct raw identifiers never collide in practice.
        #[test]
        fn identity_hash_distinct(a in "[a-zA-Z0-9-]{1,40}", b in "[a-zA-Z0-9-]{1,40}") {
            prop_assume!(a != b);
            prop_assert_ne!(hash_identity(&a), hash_identity(&b));
        }
    }
}
