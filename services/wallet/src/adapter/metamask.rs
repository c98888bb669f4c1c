//! MetaMask adapter

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use types::{ChainFamily, WalletEvent, WalletEventKind, WalletId};

use super::{EventHandler, EvmWalletAdapter, WalletAdapter};
use crate::error::{ProviderRpcError, Result, WalletError};
use crate::error_mapper::is_user_rejection;
use crate::provider::{resolve_metamask, Eip1193Provider, ProviderListener, ProviderSlot};

/// One registered handler and the provider-level wrapper standing in for it
struct Subscription {
    handler: EventHandler,
    wrapper: ProviderListener,
    /// Provider the wrapper was registered on; the slot may change later
    provider: Arc<dyn Eip1193Provider>,
}

/// Adapter for the MetaMask browser extension
pub struct MetaMaskAdapter {
    slot: ProviderSlot,
    subscriptions: Mutex<HashMap<WalletEventKind, Vec<Subscription>>>,
}

impl MetaMaskAdapter {
    pub fn new(slot: ProviderSlot) -> Self {
        Self {
            slot,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    fn provider(&self) -> Option<Arc<dyn Eip1193Provider>> {
        resolve_metamask(&self.slot)
    }

    fn require_provider(&self) -> Result<Arc<dyn Eip1193Provider>> {
        self.provider().ok_or(WalletError::NotInstalled {
            wallet: WalletId::MetaMask,
        })
    }

    /// Handlers currently subscribed to `kind`
    pub fn subscription_count(&self, kind: WalletEventKind) -> usize {
        self.subscriptions.lock().get(&kind).map_or(0, Vec::len)
    }
}

fn parse_accounts(value: Value) -> std::result::Result<Vec<String>, ProviderRpcError> {
    serde_json::from_value(value)
        .map_err(|e| ProviderRpcError::message(format!("Malformed accounts response: {}", e)))
}

#[async_trait]
impl WalletAdapter for MetaMaskAdapter {
    fn id(&self) -> WalletId {
        WalletId::MetaMask
    }

    fn name(&self) -> &'static str {
        "MetaMask"
    }

    fn family(&self) -> ChainFamily {
        ChainFamily::Evm
    }

    fn is_installed(&self) -> bool {
        self.provider().is_some()
    }

    async fn connect(&self) -> Result<Vec<String>> {
        let provider = self.require_provider()?;

        match provider.request("eth_requestAccounts", Value::Null).await {
            Ok(value) => parse_accounts(value).map_err(WalletError::ConnectFailed),
            Err(raw) if is_user_rejection(&raw) => {
                debug!(code = ?raw.code, "MetaMask connection rejected by user");
                Err(WalletError::UserRejected(raw))
            }
            Err(raw) => {
                warn!(code = ?raw.code, message = %raw.message, "MetaMask connection failed");
                Err(WalletError::ConnectFailed(raw))
            }
        }
    }

    async fn get_accounts(&self) -> Vec<String> {
        let Some(provider) = self.provider() else {
            return Vec::new();
        };

        match provider.request("eth_accounts", Value::Null).await {
            Ok(value) => parse_accounts(value).unwrap_or_else(|e| {
                debug!(message = %e.message, "Ignoring malformed eth_accounts response");
                Vec::new()
            }),
            Err(e) => {
                debug!(code = ?e.code, message = %e.message, "eth_accounts failed");
                Vec::new()
            }
        }
    }

    fn on(&self, kind: WalletEventKind, handler: EventHandler) {
        let mut subscriptions = self.subscriptions.lock();
        let registered = subscriptions.entry(kind).or_default();

        if registered.iter().any(|sub| sub.handler.same_as(&handler)) {
            debug!(event = %kind, "Handler already subscribed");
            return;
        }

        let Some(provider) = self.provider() else {
            debug!(event = %kind, "MetaMask not installed; subscription skipped");
            return;
        };

        let target = handler.clone();
        let wrapper: ProviderListener = Arc::new(move |payload: &Value| {
            match WalletEvent::decode(kind, payload) {
                Ok(event) => target.call(event),
                Err(e) => warn!(event = %kind, error = %e, "Dropping malformed provider event"),
            }
        });

        provider.on(kind.as_str(), wrapper.clone());
        registered.push(Subscription {
            handler,
            wrapper,
            provider,
        });
    }

    fn off(&self, kind: WalletEventKind, handler: &EventHandler) {
        let removed = {
            let mut subscriptions = self.subscriptions.lock();
            let Some(registered) = subscriptions.get_mut(&kind) else {
                return;
            };
            match registered.iter().position(|sub| sub.handler.same_as(handler)) {
                Some(index) => registered.remove(index),
                None => return,
            }
        };

        removed
            .provider
            .remove_listener(kind.as_str(), &removed.wrapper);
    }

    fn as_evm(&self) -> Option<&dyn EvmWalletAdapter> {
        Some(self)
    }
}

#[async_trait]
impl EvmWalletAdapter for MetaMaskAdapter {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let provider = self.require_provider()?;
        provider.request(method, params).await.map_err(|raw| {
            if is_user_rejection(&raw) {
                WalletError::UserRejected(raw)
            } else {
                WalletError::Provider(raw)
            }
        })
    }

    async fn get_chain_id(&self) -> Result<String> {
        let provider = self.require_provider()?;

        match provider.request("eth_chainId", Value::Null).await {
            Ok(Value::String(hex)) => Ok(hex),
            Ok(other) => Err(WalletError::ChainIdFetchFailed(ProviderRpcError::message(
                format!("Unexpected eth_chainId response: {}", other),
            ))),
            Err(raw) => Err(WalletError::ChainIdFetchFailed(raw)),
        }
    }
}
