//! # Wallet Adapters
//!
//! Normalizes heterogeneous wallet providers into one connect/query/event
//! surface. The common contract lives in [`WalletAdapter`]; chain-family
//! specific operations live in capability traits reached through
//! [`WalletAdapter::as_evm`].

pub mod metamask;
pub mod registry;

pub use metamask::MetaMaskAdapter;
pub use registry::AdapterRegistry;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use types::{ChainFamily, WalletEvent, WalletEventKind, WalletId};

use crate::error::Result;

/// Caller-supplied event callback.
///
/// Identity is the underlying allocation: clones of one handler are the same
/// handler, two handlers built from identical closures are not.
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(WalletEvent) + Send + Sync>);

impl EventHandler {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(WalletEvent) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// True when both refer to the same callback
    pub fn same_as(&self, other: &EventHandler) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }

    /// Invoke the callback
    pub fn call(&self, event: WalletEvent) {
        (self.0)(event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Common contract every wallet adapter implements
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Wallet this adapter serves
    fn id(&self) -> WalletId;

    /// Display name
    fn name(&self) -> &'static str;

    /// Capability marker
    fn family(&self) -> ChainFamily;

    /// Probe for the provider; never fails and never caches
    fn is_installed(&self) -> bool;

    /// Request authorization
    ///
    /// Fails with:
    /// 1. `NotInstalled` when no provider is present
    /// 2. `UserRejected` when the user declines
    /// 3. `ConnectFailed` for anything else
    async fn connect(&self) -> Result<Vec<String>>;

    /// Silent account read; empty on any failure
    async fn get_accounts(&self) -> Vec<String>;

    /// Subscribe `handler` to `kind`; subscribing the same handler again is a no-op
    fn on(&self, kind: WalletEventKind, handler: EventHandler);

    /// Unsubscribe `handler` from `kind`; unknown handlers are ignored
    fn off(&self, kind: WalletEventKind, handler: &EventHandler);

    /// EVM capability, when the adapter has it
    fn as_evm(&self) -> Option<&dyn EvmWalletAdapter> {
        None
    }
}

/// EVM-only operations
#[async_trait]
pub trait EvmWalletAdapter: WalletAdapter {
    /// Raw provider request with errors mapped into [`crate::WalletError`]
    async fn request(&self, method: &str, params: Value) -> Result<Value>;

    /// Active chain id in provider hex form; fails with `ChainIdFetchFailed`
    async fn get_chain_id(&self) -> Result<String>;
}
