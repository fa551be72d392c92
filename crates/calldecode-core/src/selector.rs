//! Function selectors.
//!
//! The selector of a function is the first four bytes of the keccak256
//! hash of its canonical signature string, e.g.:
//!   keccak256("transfer(address,uint256)")[..4] → 0xa9059cbb
//!
//! For raw calldata the first four bytes ARE the selector; we never need
//! to recompute it to split a payload.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tiny_keccak::{Hasher, Keccak};

/// A 4-byte function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Selector([u8; 4]);

impl Selector {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Compute the selector of a canonical signature string.
    pub fn from_signature_text(canonical: &str) -> Self {
        let hash = keccak256(canonical.as_bytes());
        Self([hash[0], hash[1], hash[2], hash[3]])
    }

    /// Split raw calldata into its selector and argument body.
    /// Returns `None` if fewer than 4 bytes are present.
    pub fn split_calldata(calldata: &[u8]) -> Option<(Self, &[u8])> {
        if calldata.len() < 4 {
            return None;
        }
        let (head, body) = calldata.split_at(4);
        let head: [u8; 4] = head.try_into().ok()?;
        Some((Self(head), body))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Lowercase hex without the `0x` prefix, as used for registry keys.
    pub fn hex_key(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 4]> for Selector {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix("0x").unwrap_or(s);
        if hex.len() != 8 {
            return Err(format!("selector must be 8 hex characters, got '{s}'"));
        }
        let mut out = [0u8; 4];
        hex::decode_to_slice(hex, &mut out).map_err(|e| format!("invalid selector '{s}': {e}"))?;
        Ok(Self(out))
    }
}

impl From<Selector> for String {
    fn from(sel: Selector) -> Self {
        sel.to_string()
    }
}

impl TryFrom<String> for Selector {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// keccak256 of an arbitrary byte string.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erc20_transfer_selector() {
        let sel = Selector::from_signature_text("transfer(address,uint256)");
        assert_eq!(sel.to_string(), "0xa9059cbb");
        assert_eq!(sel.hex_key(), "a9059cbb");
    }

    #[test]
    fn parse_with_and_without_prefix() {
        let a: Selector = "0xa9059cbb".parse().unwrap();
        let b: Selector = "A9059CBB".parse().unwrap();
        assert_eq!(a, b);
        assert!("0xa9059c".parse::<Selector>().is_err());
        assert!("0xzz059cbb".parse::<Selector>().is_err());
    }

    #[test]
    fn split_short_calldata() {
        assert!(Selector::split_calldata(&[0xa9, 0x05, 0x9c]).is_none());
        let (sel, body) = Selector::split_calldata(&[0xa9, 0x05, 0x9c, 0xbb, 0x01]).unwrap();
        assert_eq!(sel, Selector::new([0xa9, 0x05, 0x9c, 0xbb]));
        assert_eq!(body, &[0x01]);
    }

    #[test]
    fn serde_as_hex_string() {
        let sel = Selector::new([0xa9, 0x05, 0x9c, 0xbb]);
        let json = serde_json::to_string(&sel).unwrap();
        assert_eq!(json, "\"0xa9059cbb\"");
        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sel);
    }
}
