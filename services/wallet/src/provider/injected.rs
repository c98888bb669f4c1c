//! In-process provider
//!
//! Stands in for a browser-injected provider: requests go to a pluggable
//! async handler and events are pushed with [`InjectedProvider::emit`].

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::{same_listener, Eip1193Provider, ProviderListener};
use crate::error::ProviderRpcError;

/// EIP-1193 code for an unsupported method
pub const UNSUPPORTED_METHOD_CODE: i64 = 4200;

/// Async request handler: `(method, params) -> result`
pub type RequestHandler =
    Arc<dyn Fn(String, Value) -> BoxFuture<'static, Result<Value, ProviderRpcError>> + Send + Sync>;

/// Provider driven by a request handler and explicit event emission
pub struct InjectedProvider {
    is_metamask: bool,
    members: Vec<Arc<dyn Eip1193Provider>>,
    handler: RwLock<Option<RequestHandler>>,
    listeners: Mutex<HashMap<String, Vec<ProviderListener>>>,
}

impl InjectedProvider {
    pub fn new(is_metamask: bool) -> Self {
        Self {
            is_metamask,
            members: Vec::new(),
            handler: RwLock::new(None),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Provider carrying the MetaMask flag
    pub fn metamask() -> Self {
        Self::new(true)
    }

    /// Expose `members` through `providers()`
    pub fn with_providers(mut self, members: Vec<Arc<dyn Eip1193Provider>>) -> Self {
        self.members = members;
        self
    }

    /// Install the request handler
    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(String, Value) -> BoxFuture<'static, Result<Value, ProviderRpcError>>
            + Send
            + Sync
            + 'static,
    {
        self.set_handler(handler);
        self
    }

    /// Replace the request handler
    pub fn set_handler<F>(&self, handler: F)
    where
        F: Fn(String, Value) -> BoxFuture<'static, Result<Value, ProviderRpcError>>
            + Send
            + Sync
            + 'static,
    {
        *self.handler.write() = Some(Arc::new(handler));
    }

    /// Deliver `payload` to every listener of `event`
    pub fn emit(&self, event: &str, payload: Value) {
        // Snapshot so a listener may unsubscribe while we iterate
        let snapshot: Vec<ProviderListener> = self
            .listeners
            .lock()
            .get(event)
            .cloned()
            .unwrap_or_default();

        debug!(event, listeners = snapshot.len(), "Emitting provider event");
        for listener in snapshot {
            listener(&payload);
        }
    }

    /// Number of registrations for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.lock().get(event).map_or(0, Vec::len)
    }
}

#[async_trait]
impl Eip1193Provider for InjectedProvider {
    fn is_metamask(&self) -> bool {
        self.is_metamask
    }

    fn providers(&self) -> Vec<Arc<dyn Eip1193Provider>> {
        self.members.clone()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => handler(method.to_string(), params).await,
            None => Err(ProviderRpcError::new(
                UNSUPPORTED_METHOD_CODE,
                format!("Unsupported method: {}", method),
            )),
        }
    }

    fn on(&self, event: &str, listener: ProviderListener) {
        self.listeners
            .lock()
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    fn remove_listener(&self, event: &str, listener: &ProviderListener) {
        let mut listeners = self.listeners.lock();
        if let Some(registered) = listeners.get_mut(event) {
            if let Some(index) = registered.iter().position(|l| same_listener(l, listener)) {
                registered.remove(index);
            }
        }
    }
}
