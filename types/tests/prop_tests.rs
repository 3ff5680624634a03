use proptest::prelude::*;

use evote_types::{IdentityHash, ReceiptHash, TxHash, WalletAddress};

proptest! {
    /// TxHash roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn tx_hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
    }

    /// TxHash::is_zero is true only for all-zero bytes.
    #[test]
    fn tx_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Digest hex rendering always parses back to the same value.
    #[test]
    fn identity_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = IdentityHash::new(bytes);
        let rendered = hash.to_string();
        prop_assert_eq!(rendered.len(), 66);
        prop_assert_eq!(IdentityHash::parse(&rendered).unwrap(), hash);
    }

    /// ReceiptHash JSON serde roundtrip (string-encoded on the wire).
    #[test]
    fn receipt_hash_json_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ReceiptHash::new(bytes);
        let encoded = serde_json::to_string(&hash).unwrap();
        let decoded: ReceiptHash = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, hash);
    }

    /// Address byte roundtrip and canonical lowercase rendering.
    #[test]
    fn address_bytes_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let addr = WalletAddress::from_bytes(&bytes);
        prop_assert_eq!(addr.to_bytes(), bytes);
        prop_assert!(addr.as_str().starts_with("0x"));
        let lowered = addr.as_str().to_ascii_lowercase();
        prop_assert_eq!(addr.as_str(), lowered.as_str());
    }

    /// Parsing is case-insensitive: any case mix normalizes to one value.
    #[test]
    fn address_parse_normalizes(bytes in prop::array::uniform20(0u8..)) {
        let lower = WalletAddress::from_bytes(&bytes);
        let upper = format!("0x{}", hex::encode_upper(bytes));
        let parsed = WalletAddress::parse(&upper).unwrap();
        prop_assert_eq!(parsed, lower);
    }
}
