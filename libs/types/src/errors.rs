//! Symbolic error taxonomy
//!
//! Session and balance state only ever carry an [`ErrorKind`]. Each kind owns
//! a fixed user-facing message, so raw provider or RPC text cannot leak into
//! anything a user sees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic error kinds surfaced to state and notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No adapter exists for the requested wallet
    AdapterNotFound,
    /// Wallet provider is not present in the injection slot
    NotInstalled,
    /// User declined the authorization request
    UserRejected,
    /// Authorization failed for any other reason
    ConnectFailed,
    /// Provider could not report the active chain
    ChainIdFetchFailed,
    /// A chain id is needed but none is known
    ChainIdRequired,
    /// Active chain is not supported
    ChainUnsupported,
    /// Wallet is on a different chain than expected
    ChainMismatch,
    /// Custom token lookup without a contract address
    ContractAddressRequired,
    /// Malformed address
    AddressInvalid,
    /// Contract is missing or not an ERC-20 on the active chain
    TokenNotSupported,
    /// Balance read failed for an unclassified reason
    BalanceFetchFailed,
    /// Anything else
    UnknownError,
}

impl ErrorKind {
    /// Fixed user-facing message for this kind
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::AdapterNotFound => "Wallet adapter not found",
            ErrorKind::NotInstalled => "Wallet is not installed",
            ErrorKind::UserRejected => "Connection rejected",
            ErrorKind::ConnectFailed => "Failed to connect wallet",
            ErrorKind::ChainIdFetchFailed => "Failed to get chain ID",
            ErrorKind::ChainIdRequired => "Chain ID is required",
            ErrorKind::ChainUnsupported => "This network is not supported",
            ErrorKind::ChainMismatch => "Network mismatch detected",
            ErrorKind::ContractAddressRequired => "Contract address is required",
            ErrorKind::AddressInvalid => "Invalid Ethereum address format",
            ErrorKind::TokenNotSupported => {
                "This token is not supported on the current network, or the contract address is not a valid ERC-20 token."
            }
            ErrorKind::BalanceFetchFailed => {
                "Unable to fetch token balance. Please try again later."
            }
            ErrorKind::UnknownError => "An unexpected error occurred. Please try again later.",
        }
    }

    /// True for kinds produced by local input validation rather than an external call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::ChainIdRequired | ErrorKind::ContractAddressRequired
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}
