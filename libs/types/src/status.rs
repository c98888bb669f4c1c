//! Session and token status enums

use serde::{Deserialize, Serialize};

/// Connection status of the wallet session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No session
    #[default]
    Idle,
    /// Authorization requested, waiting on the provider
    Connecting,
    /// Authorized with at least one account
    Connected,
    /// Last connect attempt failed; `error_kind` says why
    Error,
}

impl SessionStatus {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Disconnected",
            SessionStatus::Connecting => "Connecting",
            SessionStatus::Connected => "Connected",
            SessionStatus::Error => "Error",
        }
    }
}

/// Status of one tracked token balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    /// Balance read succeeded
    Ok,
    /// Token is not deployed on the active chain; no read was made
    Na,
    /// Balance read failed for this token only
    Error,
    /// Read in flight
    Loading,
}

impl TokenStatus {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            TokenStatus::Ok => "OK",
            TokenStatus::Na => "N/A",
            TokenStatus::Error => "Error",
            TokenStatus::Loading => "Loading",
        }
    }
}
