//! Checksummed EVM account/contract address.
//!
//! Accepts `0x` + 40 hex digits. All-lowercase or all-uppercase input is
//! normalized to the EIP-55 form; mixed-case input must already carry a
//! valid EIP-55 checksum.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Serialize, Serializer};

use super::error::LookupError;

/// A validated 20-byte address, rendered checksummed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvmAddress(Address);

impl EvmAddress {
    /// Validate and normalize a raw address string.
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let trimmed = input.trim();
        let invalid = |reason: &str| LookupError::InvalidAddress(format!("{trimmed}: {reason}"));

        let hex = trimmed
            .strip_prefix("0x")
            .ok_or_else(|| invalid("missing 0x prefix"))?;

        if hex.len() != 40 {
            return Err(invalid("expected 40 hex digits"));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex character"));
        }

        let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());

        let address = if has_lower && has_upper {
            Address::parse_checksummed(trimmed, None).map_err(|_| invalid("bad EIP-55 checksum"))?
        } else {
            Address::from_str(hex).map_err(|e| invalid(&e.to_string()))?
        };

        Ok(Self(address))
    }

    /// Underlying alloy address for contract calls.
    pub const fn inner(&self) -> Address {
        self.0
    }

    /// EIP-55 checksummed string.
    pub fn checksummed(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl From<Address> for EvmAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl FromStr for EvmAddress {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksummed())
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.checksummed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_lowercase_is_normalized() {
        let addr = EvmAddress::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(addr.checksummed(), CHECKSUMMED);
    }

    #[test]
    fn test_uppercase_hex_is_normalized() {
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());
        let addr = EvmAddress::parse(&upper).unwrap();
        assert_eq!(addr.to_string(), CHECKSUMMED);
    }

    #[test]
    fn test_valid_checksum_accepted() {
        let addr: EvmAddress = CHECKSUMMED.parse().unwrap();
        assert_eq!(addr.checksummed(), CHECKSUMMED);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let err = EvmAddress::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").unwrap_err();
        assert!(matches!(err, LookupError::InvalidAddress(_)));
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        for input in [
            "not-an-address",
            "",
            "0x1234",
            "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xZZAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        ] {
            assert!(
                matches!(EvmAddress::parse(input), Err(LookupError::InvalidAddress(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_serializes_checksummed() {
        let addr = EvmAddress::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{CHECKSUMMED}\""));
    }
}
