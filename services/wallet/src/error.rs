//! Error types for the wallet service

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use types::{ErrorKind, WalletId};

use crate::error_mapper::map_error_kind;

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// EIP-1193 code for a request the user declined
pub const USER_REJECTED_CODE: i64 = 4001;

/// Raw error reported by a provider or an RPC endpoint.
///
/// Carries technical text for diagnostics only; it is mapped to an
/// [`ErrorKind`] before it reaches any state a user sees.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message} (code {code:?})")]
pub struct ProviderRpcError {
    /// Numeric code when the source supplies one
    pub code: Option<i64>,
    /// Technical message
    pub message: String,
    /// Optional structured detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    /// Error with a numeric code
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            data: None,
        }
    }

    /// Error carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            data: None,
        }
    }

    /// The canonical EIP-1193 rejection
    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_CODE, "User rejected the request.")
    }
}

impl From<&str> for ProviderRpcError {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

impl From<web3::Error> for ProviderRpcError {
    fn from(error: web3::Error) -> Self {
        match error {
            web3::Error::Rpc(rpc) => Self {
                code: Some(rpc.code.code()),
                message: rpc.message,
                data: rpc.data,
            },
            other => Self::message(other.to_string()),
        }
    }
}

impl From<web3::contract::Error> for ProviderRpcError {
    fn from(error: web3::contract::Error) -> Self {
        match error {
            web3::contract::Error::Api(api) => api.into(),
            other => Self::message(other.to_string()),
        }
    }
}

/// Main error type for adapter and session plumbing
#[derive(Debug, Clone, Error)]
pub enum WalletError {
    /// Registry has no adapter for this wallet
    #[error("No adapter available for wallet {wallet}")]
    AdapterNotFound {
        /// Wallet that was requested
        wallet: WalletId,
    },

    /// Provider for this wallet is not in the injection slot
    #[error("Wallet {wallet} is not installed")]
    NotInstalled {
        /// Wallet that was probed
        wallet: WalletId,
    },

    /// Authorization request declined by the user
    #[error("User rejected the request: {0}")]
    UserRejected(ProviderRpcError),

    /// Authorization request failed
    #[error("Connect failed: {0}")]
    ConnectFailed(ProviderRpcError),

    /// `eth_chainId` failed or returned garbage
    #[error("Chain id fetch failed: {0}")]
    ChainIdFetchFailed(ProviderRpcError),

    /// Any other provider request failure
    #[error("Provider error: {0}")]
    Provider(ProviderRpcError),
}

impl WalletError {
    /// Symbolic kind for state and notifications
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::AdapterNotFound { .. } => ErrorKind::AdapterNotFound,
            WalletError::NotInstalled { .. } => ErrorKind::NotInstalled,
            WalletError::UserRejected(_) => ErrorKind::UserRejected,
            WalletError::ConnectFailed(_) => ErrorKind::ConnectFailed,
            WalletError::ChainIdFetchFailed(_) => ErrorKind::ChainIdFetchFailed,
            WalletError::Provider(raw) => map_error_kind(raw),
        }
    }

    /// True when the user declined the request
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WalletError::UserRejected(_))
    }
}
