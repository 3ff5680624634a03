//! 32-byte digest newtypes for transactions, identities, and vote receipts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CoreError;

macro_rules! digest_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Parse from a `0x`-prefixed 64-hex-digit string.
            pub fn parse(raw: &str) -> Result<Self, CoreError> {
                let s = raw.trim();
                let hex_part = s.strip_prefix("0x").unwrap_or(s);
                if hex_part.len() != 64 {
                    return Err(CoreError::InvalidDigest(s.to_string()));
                }
                let decoded = hex::decode(hex_part)
                    .map_err(|_| CoreError::InvalidDigest(s.to_string()))?;
                let mut out = [0u8; 32];
                out.copy_from_slice(&decoded);
                Ok(Self(out))
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(0x{})"), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(h: $name) -> String {
                h.to_string()
            }
        }
    };
}

digest_newtype!(
    /// Hash of a submitted ledger transaction.
    TxHash
);

digest_newtype!(
    /// One-way digest of a voter's raw external identifier.
    ///
    /// The raw identifier is hashed at the system boundary and never stored.
    IdentityHash
);

digest_newtype!(
    /// A commit-reveal receipt digest (`keccak256(candidateId ++ secret)`).
    ReceiptHash
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_prefixed_and_bare_hex() {
        let hex64 = "aa".repeat(32);
        let with = TxHash::parse(&format!("0x{hex64}")).unwrap();
        let without = TxHash::parse(&hex64).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn parse_rejects_short_input() {
        assert!(TxHash::parse("0xabcd").is_err());
    }

    #[test]
    fn display_is_prefixed_lowercase() {
        let h = ReceiptHash::new([0xAB; 32]);
        let s = h.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 66);
        assert_eq!(&s[2..4], "ab");
    }

    #[test]
    fn display_parse_roundtrip() {
        let h = IdentityHash::new([7u8; 32]);
        assert_eq!(IdentityHash::parse(&h.to_string()).unwrap(), h);
    }

    #[test]
    fn zero_detection() {
        assert!(TxHash::ZERO.is_zero());
        assert!(!TxHash::new([1u8; 32]).is_zero());
    }
}
