//! EIP-1193 provider surface
//!
//! Wallet extensions inject a provider object into one shared slot. Several
//! extensions may share the slot, in which case the root provider lists the
//! individual ones in [`Eip1193Provider::providers`]. Extensions can also
//! attach late, so the slot is re-read on every probe.

pub mod http;
pub mod injected;

pub use http::HttpProvider;
pub use injected::{InjectedProvider, RequestHandler};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ProviderRpcError;

/// Callback registered on a provider event
pub type ProviderListener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Minimal EIP-1193 provider
#[async_trait]
pub trait Eip1193Provider: Send + Sync {
    /// Capability flag set by MetaMask (and by wallets imitating it)
    fn is_metamask(&self) -> bool;

    /// Individual providers when several extensions share the slot
    fn providers(&self) -> Vec<Arc<dyn Eip1193Provider>> {
        Vec::new()
    }

    /// JSON-RPC request
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;

    /// Register `listener` for `event`; providers do not deduplicate
    fn on(&self, event: &str, listener: ProviderListener);

    /// Remove one registration of `listener` for `event`
    fn remove_listener(&self, event: &str, listener: &ProviderListener);
}

/// Identity comparison for listeners (same allocation)
pub fn same_listener(a: &ProviderListener, b: &ProviderListener) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Identity comparison for providers (same allocation)
pub fn same_provider(a: &Arc<dyn Eip1193Provider>, b: &Arc<dyn Eip1193Provider>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Shared injection slot
#[derive(Clone, Default)]
pub struct ProviderSlot {
    inner: Arc<RwLock<Option<Arc<dyn Eip1193Provider>>>>,
}

impl ProviderSlot {
    /// Empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot already holding `provider`
    pub fn with_provider(provider: Arc<dyn Eip1193Provider>) -> Self {
        let slot = Self::new();
        slot.inject(provider);
        slot
    }

    /// Install or replace the root provider
    pub fn inject(&self, provider: Arc<dyn Eip1193Provider>) {
        *self.inner.write() = Some(provider);
    }

    /// Remove the root provider
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    /// Root provider, if any
    pub fn current(&self) -> Option<Arc<dyn Eip1193Provider>> {
        self.inner.read().clone()
    }
}

impl std::fmt::Debug for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSlot")
            .field("occupied", &self.inner.read().is_some())
            .finish()
    }
}

/// Find the MetaMask provider in the slot.
///
/// A flagged member of `providers()` wins over the root, since other wallets
/// sharing the slot may leave their own provider at the root.
pub fn resolve_metamask(slot: &ProviderSlot) -> Option<Arc<dyn Eip1193Provider>> {
    let root = slot.current()?;

    if let Some(found) = root
        .providers()
        .into_iter()
        .find(|provider| provider.is_metamask())
    {
        return Some(found);
    }

    if root.is_metamask() {
        Some(root)
    } else {
        None
    }
}
