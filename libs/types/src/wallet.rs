//! Wallet identifiers and capability families

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Known wallet identifiers.
///
/// Only some of these have a working adapter; the registry answers with an
/// explicit "unsupported" marker for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletId {
    /// MetaMask browser extension
    #[serde(rename = "metamask")]
    MetaMask,
    /// Trust Wallet
    Trust,
    /// OKX Wallet
    Okx,
    /// Phantom
    Phantom,
}

impl WalletId {
    /// Every wallet id, in display order
    pub const ALL: [WalletId; 4] = [
        WalletId::MetaMask,
        WalletId::Trust,
        WalletId::Okx,
        WalletId::Phantom,
    ];

    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletId::MetaMask => "metamask",
            WalletId::Trust => "trust",
            WalletId::Okx => "okx",
            WalletId::Phantom => "phantom",
        }
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known wallet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown wallet id: {0}")]
pub struct UnknownWalletId(pub String);

impl FromStr for WalletId {
    type Err = UnknownWalletId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownWalletId(s.to_string()))
    }
}

/// Capability family of a wallet adapter.
///
/// Callers branch on the family only to reach family-specific operations
/// (chain id reads for EVM); the common adapter contract is family-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChainFamily {
    /// EIP-1193 compatible chains
    Evm,
    /// Solana wallets (no adapter yet)
    Solana,
}
