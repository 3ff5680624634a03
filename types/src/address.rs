//! Wallet address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CoreError;

/// A 20-byte ledger wallet address, rendered as `0x` + 40 hex characters.
///
/// Addresses are normalized to lowercase on construction so that lookups and
/// uniqueness checks are case-insensitive. Both a plain contract address and
/// an externally owned account use this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The standard prefix for all ledger addresses.
    pub const PREFIX: &'static str = "0x";

    /// Parse and normalize an address string.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let hex_part = trimmed
            .strip_prefix(Self::PREFIX)
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidAddress(trimmed.to_string()))?;

        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAddress(trimmed.to_string()));
        }

        Ok(Self(format!("0x{}", hex_part.to_ascii_lowercase())))
    }

    /// Build an address from its 20 raw bytes.
    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// The 20 raw bytes of this address.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        // Always valid: construction guarantees 40 hex chars after the prefix.
        let decoded = hex::decode(&self.0[2..]).expect("address hex is validated on construction");
        out.copy_from_slice(&decoded);
        out
    }

    /// Return the canonical lowercase address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<WalletAddress> for String {
    fn from(a: WalletAddress) -> String {
        a.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case() {
        let a = WalletAddress::parse("0xABCDEF0123456789abcdef0123456789ABCDEF01").unwrap();
        assert_eq!(a.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert!(WalletAddress::parse("abcdef0123456789abcdef0123456789abcdef01").is_err());
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(WalletAddress::parse("0xabc").is_err());
        assert!(WalletAddress::parse("0xabcdef0123456789abcdef0123456789abcdef0123").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(WalletAddress::parse("0xzzcdef0123456789abcdef0123456789abcdef01").is_err());
    }

    #[test]
    fn bytes_roundtrip() {
        let bytes = [0x5a; 20];
        let a = WalletAddress::from_bytes(&bytes);
        assert_eq!(a.to_bytes(), bytes);
    }

    #[test]
    fn equality_is_case_insensitive_via_normalization() {
        let a = WalletAddress::parse("0xAAaa00000000000000000000000000000000FFff").unwrap();
        let b = WalletAddress::parse("0xaaaa00000000000000000000000000000000ffff").unwrap();
        assert_eq!(a, b);
    }
}
