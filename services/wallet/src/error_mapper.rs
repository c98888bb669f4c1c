//! Raw provider error classification
//!
//! Maps a [`ProviderRpcError`] to one [`ErrorKind`] by code and by ordered
//! substring rules over the lower-cased message. The raw error is recorded
//! at `debug` level and never returned.

use tracing::debug;
use types::ErrorKind;

use crate::error::{ProviderRpcError, USER_REJECTED_CODE};

const REJECTION_PATTERNS: &[&str] = &["user rejected", "user denied"];

const TOKEN_FAULT_PATTERNS: &[&str] = &[
    "parameter decoding error",
    "abi",
    "execution reverted",
    "invalid contract",
    "not a valid erc-20",
    "invalid opcode",
    "revert",
    "invalid jump destination",
    "out of gas",
    "invalid token",
    "token not found",
    "not deployed",
    "contract",
];

/// True when the error is a user declining the request
pub fn is_user_rejection(error: &ProviderRpcError) -> bool {
    if error.code == Some(USER_REJECTED_CODE) {
        return true;
    }
    let message = error.message.to_lowercase();
    contains_any(&message, REJECTION_PATTERNS)
}

/// Classify a raw provider error
pub fn map_error_kind(error: &ProviderRpcError) -> ErrorKind {
    let kind = classify(error);
    debug!(
        code = ?error.code,
        message = %error.message,
        ?kind,
        "Classified provider error"
    );
    kind
}

/// Classify a balance read error; unclassified faults become `BalanceFetchFailed`
pub fn map_balance_error_kind(error: &ProviderRpcError) -> ErrorKind {
    match map_error_kind(error) {
        ErrorKind::UnknownError => ErrorKind::BalanceFetchFailed,
        kind => kind,
    }
}

fn classify(error: &ProviderRpcError) -> ErrorKind {
    if is_user_rejection(error) {
        return ErrorKind::UserRejected;
    }

    let message = error.message.to_lowercase();

    if contains_any(&message, &["not installed", "not available"]) {
        return ErrorKind::NotInstalled;
    }

    if contains_any(&message, &["method not found", "unsupported method"]) {
        return ErrorKind::ConnectFailed;
    }

    if contains_any(&message, &["invalid address", "invalid ethereum address"]) {
        return ErrorKind::AddressInvalid;
    }

    if message.contains("chain id") && contains_any(&message, &["missing", "required"]) {
        return ErrorKind::ChainIdRequired;
    }

    if contains_any(&message, &["chain id", "get chain"]) {
        return ErrorKind::ChainIdFetchFailed;
    }

    if contains_any(&message, &["chain mismatch", "wrong network"]) {
        return ErrorKind::ChainMismatch;
    }

    if contains_any(&message, &["unsupported network", "unsupported chain"]) {
        return ErrorKind::ChainUnsupported;
    }

    if contains_any(&message, TOKEN_FAULT_PATTERNS) {
        return ErrorKind::TokenNotSupported;
    }

    if contains_any(&message, &["connect", "connection"]) {
        return ErrorKind::ConnectFailed;
    }

    ErrorKind::UnknownError
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
