//! Adapter registry
//!
//! Resolves a [`WalletId`] to its adapter. Lookups are memoized for the life
//! of the registry, including the "unsupported" answer for wallets that have
//! no adapter yet.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use types::WalletId;

use super::{MetaMaskAdapter, WalletAdapter};
use crate::provider::ProviderSlot;

pub struct AdapterRegistry {
    slot: ProviderSlot,
    adapters: DashMap<WalletId, Option<Arc<dyn WalletAdapter>>>,
}

impl AdapterRegistry {
    /// Registry whose adapters probe `slot`
    pub fn new(slot: ProviderSlot) -> Self {
        Self {
            slot,
            adapters: DashMap::new(),
        }
    }

    /// Adapter for `wallet`, or `None` when the wallet is unsupported
    pub fn get(&self, wallet: WalletId) -> Option<Arc<dyn WalletAdapter>> {
        self.adapters
            .entry(wallet)
            .or_insert_with(|| self.build(wallet))
            .clone()
    }

    /// Replace the adapter for `wallet`
    pub fn register(&self, wallet: WalletId, adapter: Arc<dyn WalletAdapter>) {
        self.adapters.insert(wallet, Some(adapter));
    }

    /// Wallets whose provider is currently present
    pub fn installed_wallets(&self) -> Vec<WalletId> {
        WalletId::ALL
            .into_iter()
            .filter(|wallet| {
                self.get(*wallet)
                    .map_or(false, |adapter| adapter.is_installed())
            })
            .collect()
    }

    fn build(&self, wallet: WalletId) -> Option<Arc<dyn WalletAdapter>> {
        match wallet {
            WalletId::MetaMask => Some(Arc::new(MetaMaskAdapter::new(self.slot.clone()))),
            WalletId::Trust | WalletId::Okx | WalletId::Phantom => {
                debug!(%wallet, "No adapter for wallet");
                None
            }
        }
    }
}
