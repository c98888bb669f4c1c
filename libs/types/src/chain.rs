//! EVM chain identifiers
//!
//! Providers report chain ids as `0x`-prefixed hex strings; everything
//! downstream (config tables, balance reads) works with the decimal value.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while decoding a hex chain id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainIdParseError {
    /// Input was empty or only a `0x` prefix
    #[error("chain id is empty")]
    Empty,

    /// Input contained non-hex characters or overflowed u64
    #[error("invalid hex chain id: {0}")]
    InvalidHex(String),
}

/// Decimal EVM chain id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Ethereum mainnet
    pub const ETHEREUM: ChainId = ChainId(1);
    /// BNB Chain testnet
    pub const BSC_TESTNET: ChainId = ChainId(97);

    /// Decode a provider hex string such as `"0x61"`
    pub fn from_hex(hex: &str) -> Result<Self, ChainIdParseError> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(ChainIdParseError::Empty);
        }

        u64::from_str_radix(digits, 16)
            .map(ChainId)
            .map_err(|_| ChainIdParseError::InvalidHex(hex.to_string()))
    }

    /// Encode as the `0x`-prefixed lowercase hex form providers use
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Raw decimal value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        ChainId(value)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
