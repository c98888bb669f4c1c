//! Provider event kinds and typed payloads
//!
//! EIP-1193 providers emit loosely typed JSON payloads. Adapters decode them
//! into [`WalletEvent`] at the boundary so dispatch is keyed by
//! [`WalletEventKind`] instead of string matching.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Closed set of provider events the session listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WalletEventKind {
    /// Account list changed; an empty list means the wallet disconnected
    #[serde(rename = "accountsChanged")]
    AccountsChanged,
    /// Active chain changed
    #[serde(rename = "chainChanged")]
    ChainChanged,
    /// Provider lost its connection to every chain
    #[serde(rename = "disconnect")]
    Disconnect,
}

impl WalletEventKind {
    /// Every event kind
    pub const ALL: [WalletEventKind; 3] = [
        WalletEventKind::AccountsChanged,
        WalletEventKind::ChainChanged,
        WalletEventKind::Disconnect,
    ];

    /// Event name used on the provider's `on`/`removeListener` surface
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletEventKind::AccountsChanged => "accountsChanged",
            WalletEventKind::ChainChanged => "chainChanged",
            WalletEventKind::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for WalletEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `disconnect` event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectInfo {
    /// Provider error code (EIP-1193 uses 4900/4901); 0 when the provider sent none
    #[serde(default)]
    pub code: i64,
    /// Provider supplied message
    #[serde(default)]
    pub message: String,
}

/// A decoded provider event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WalletEvent {
    /// Ordered account list, most recently selected first
    #[serde(rename = "accountsChanged")]
    AccountsChanged(Vec<String>),
    /// New chain id in provider hex form
    #[serde(rename = "chainChanged")]
    ChainChanged(String),
    /// Provider disconnect notice
    #[serde(rename = "disconnect")]
    Disconnect(DisconnectInfo),
}

impl WalletEvent {
    /// Kind of this event
    pub fn kind(&self) -> WalletEventKind {
        match self {
            WalletEvent::AccountsChanged(_) => WalletEventKind::AccountsChanged,
            WalletEvent::ChainChanged(_) => WalletEventKind::ChainChanged,
            WalletEvent::Disconnect(_) => WalletEventKind::Disconnect,
        }
    }

    /// Decode a raw provider payload for the given event kind.
    ///
    /// A `disconnect` always decodes: an unrecognised payload yields an empty
    /// [`DisconnectInfo`].
    pub fn decode(kind: WalletEventKind, payload: &Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            WalletEventKind::AccountsChanged => {
                WalletEvent::AccountsChanged(Vec::<String>::deserialize(payload)?)
            }
            WalletEventKind::ChainChanged => {
                WalletEvent::ChainChanged(String::deserialize(payload)?)
            }
            WalletEventKind::Disconnect => {
                WalletEvent::Disconnect(DisconnectInfo::deserialize(payload).unwrap_or_default())
            }
        })
    }
}
