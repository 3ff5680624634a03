//! Wallet address derivation from the submitter's public key.

use evote_types::{PublicKey, WalletAddress};

use crate::hash::keccak256;

/// Derive the ledger address for a public key: the last 20 bytes of the
/// Keccak-256 digest of the key bytes.
pub fn derive_address(public_key: &PublicKey) -> WalletAddress {
    let digest = keccak256(public_key.as_bytes());
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest[12..]);
    WalletAddress::from_bytes(&addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derivation_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn different_keys_get_different_addresses() {
        let kp1 = generate_keypair();
        let kp2 = generate_keypair();
        assert_ne!(derive_address(&kp1.public), derive_address(&kp2.public));
    }

    #[test]
    fn derived_address_is_well_formed() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert!(addr.as_str().starts_with("0x"));
        assert_eq!(addr.as_str().len(), 42);
    }
}
