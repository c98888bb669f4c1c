//! # Wallet Session
//!
//! Owns connection status, active account and active chain. Every mutation,
//! whether it comes from a caller or from a provider event, follows the same
//! protocol:
//!
//! 1. Begin an epoch token under the state lock before the first await
//! 2. After each await, re-lock and check the token
//! 3. If a newer operation began, drop the result without touching state
//!
//! The state lock is never held across an await. A silent `sync` only
//! observes the epoch: it checks its snapshot before writing but never
//! advances the counter.
//!
//! ## State Transitions
//!
//! ```text
//! idle ──connect──▶ connecting ──ok──▶ connected ──disconnect / []──▶ idle
//!                       │                  ▲ │
//!                       └──err──▶ error    └─┘ accountsChanged / chainChanged
//!                                   │
//!                                   └──connect──▶ connecting
//! ```

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};
use types::{ChainId, DisconnectInfo, ErrorKind, SessionStatus, WalletEvent, WalletEventKind, WalletId};

use crate::adapter::{AdapterRegistry, EventHandler, WalletAdapter};
use crate::epoch::{EpochGuard, EpochToken};
use crate::error::WalletError;
use crate::messages;
use crate::notify::Notifier;

/// Observable session fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub active_wallet: Option<WalletId>,
    /// Always `accounts[0]` while connected
    pub account: Option<String>,
    pub accounts: Vec<String>,
    /// Chain id exactly as the provider reported it
    pub chain_id_hex: Option<String>,
    /// Decoded chain id; `None` when the hex form did not parse
    pub chain_id: Option<ChainId>,
    pub previous_account: Option<String>,
    /// Set only while `status` is `error`
    pub error_kind: Option<ErrorKind>,
    /// Session epoch at the time of the snapshot
    pub epoch: u64,
}

/// The `(account, chain, epoch)` triple balance coordinators guard against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionIdentity {
    pub account: Option<String>,
    pub chain_id: Option<ChainId>,
    pub epoch: u64,
}

/// Read-only view of the session consumed by the balance coordinators
pub trait SessionView: Send + Sync {
    fn identity(&self) -> SessionIdentity;
}

/// Result of a [`WalletSession::connect`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Session is connected with this call's result
    Connected,
    /// Connect failed; state carries the kind
    Failed(ErrorKind),
    /// A newer operation began first; nothing was written
    Stale,
}

struct AttachedListeners {
    adapter: Arc<dyn WalletAdapter>,
    handler: EventHandler,
}

struct SessionInner {
    registry: Arc<AdapterRegistry>,
    notifier: Arc<dyn Notifier>,
    epoch: EpochGuard,
    state: Mutex<SessionState>,
    listeners: Mutex<Option<AttachedListeners>>,
    installed: Mutex<Option<Vec<WalletId>>>,
}

/// Wallet session state machine
///
/// Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<SessionInner>,
}

impl WalletSession {
    pub fn new(registry: Arc<AdapterRegistry>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                registry,
                notifier,
                epoch: EpochGuard::new(),
                state: Mutex::new(SessionState::default()),
                listeners: Mutex::new(None),
                installed: Mutex::new(None),
            }),
        }
    }

    /// Detect installed wallets once; later calls return the first answer
    pub fn init(&self) -> Vec<WalletId> {
        let mut installed = self.inner.installed.lock();
        if let Some(found) = installed.as_ref() {
            return found.clone();
        }

        let found = self.inner.registry.installed_wallets();
        info!(installed = ?found, "Wallet session initialized");
        *installed = Some(found.clone());
        found
    }

    /// Wallets found by [`WalletSession::init`], empty before it runs
    pub fn installed_wallets(&self) -> Vec<WalletId> {
        self.inner.installed.lock().clone().unwrap_or_default()
    }

    /// Current state, stamped with the session epoch
    pub fn snapshot(&self) -> SessionState {
        let state = self.inner.state.lock();
        let mut snapshot = state.clone();
        snapshot.epoch = self.inner.epoch.current();
        snapshot
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.state.lock().status
    }

    pub fn is_connected(&self) -> bool {
        let state = self.inner.state.lock();
        state.status == SessionStatus::Connected && state.account.is_some()
    }

    /// Clear the recorded error kind; status is left alone
    pub fn clear_error(&self) {
        self.inner.state.lock().error_kind = None;
    }

    /// Current session epoch
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.current()
    }

    /// Connect to `wallet`
    pub async fn connect(&self, wallet: WalletId) -> ConnectOutcome {
        // The previous session's events must not race the new authorization
        self.detach_listeners();

        let token = {
            let mut state = self.inner.state.lock();
            let token = self.inner.epoch.begin();
            state.status = SessionStatus::Connecting;
            state.error_kind = None;
            state.account = None;
            state.accounts.clear();
            state.previous_account = None;
            token
        };
        info!(%wallet, epoch = %token, "Connecting wallet");

        let Some(adapter) = self.inner.registry.get(wallet) else {
            return self.fail_fast(token, WalletError::AdapterNotFound { wallet });
        };
        if !adapter.is_installed() {
            return self.fail_fast(token, WalletError::NotInstalled { wallet });
        }

        let result = adapter.connect().await.and_then(|accounts| {
            let first = accounts.first().cloned().ok_or_else(|| {
                WalletError::ConnectFailed("Wallet returned no accounts".into())
            })?;
            Ok((first, accounts))
        });

        match result {
            Ok((account, accounts)) => {
                {
                    let mut state = self.inner.state.lock();
                    if self.inner.epoch.is_stale(token) {
                        debug!(%wallet, epoch = %token, "Discarding stale connect result");
                        return ConnectOutcome::Stale;
                    }

                    state.status = SessionStatus::Connected;
                    state.active_wallet = Some(wallet);
                    state.account = Some(account.clone());
                    state.previous_account = Some(account.clone());
                    state.accounts = accounts;
                    state.error_kind = None;
                    self.attach_listeners(adapter.clone());
                }

                self.sync_with(adapter.as_ref(), token).await;

                info!(%wallet, %account, "Wallet connected");
                self.inner.notifier.notify(messages::connected(&account));
                ConnectOutcome::Connected
            }
            Err(error) => {
                let kind = error.kind();
                {
                    let mut state = self.inner.state.lock();
                    if self.inner.epoch.is_stale(token) {
                        debug!(%wallet, epoch = %token, "Discarding stale connect failure");
                        return ConnectOutcome::Stale;
                    }

                    state.status = SessionStatus::Error;
                    state.error_kind = Some(kind);
                    state.account = None;
                    state.accounts.clear();
                    state.active_wallet = None;
                }

                warn!(%wallet, ?kind, error = %error, "Wallet connect failed");
                let notification = if error.is_user_rejection() {
                    messages::connect_rejected()
                } else {
                    messages::connect_failed()
                };
                self.inner.notifier.notify(notification);
                ConnectOutcome::Failed(kind)
            }
        }
    }

    /// Missing or uninstalled adapter: record the error without notifying
    fn fail_fast(&self, token: EpochToken, error: WalletError) -> ConnectOutcome {
        let kind = error.kind();
        {
            let mut state = self.inner.state.lock();
            if self.inner.epoch.is_stale(token) {
                return ConnectOutcome::Stale;
            }

            state.status = SessionStatus::Error;
            state.error_kind = Some(kind);
            state.account = None;
            state.accounts.clear();
            state.active_wallet = None;
            state.previous_account = None;
        }

        warn!(?kind, error = %error, "Wallet connect aborted");
        ConnectOutcome::Failed(kind)
    }

    /// Reset to idle. Always succeeds; notifies only if a wallet was active.
    pub fn disconnect_local(&self) {
        let was_active = {
            let mut state = self.inner.state.lock();
            self.inner.epoch.begin();
            let was_active = state.active_wallet.is_some();
            *state = SessionState::default();
            self.detach_listeners();
            was_active
        };

        if was_active {
            info!("Wallet disconnected");
            self.inner.notifier.notify(messages::disconnected());
        } else {
            debug!("Disconnect with no active session");
        }
    }

    /// Silent refresh of accounts and chain from the active adapter.
    ///
    /// Observes the session epoch without advancing it: a refresh never
    /// supersedes a pending connect or a balance fetch, and any operation
    /// that begins meanwhile wins over the refresh result.
    pub async fn sync(&self) {
        let (token, wallet) = {
            let state = self.inner.state.lock();
            match (state.status, state.active_wallet) {
                (SessionStatus::Connected, Some(wallet)) => (self.inner.epoch.snapshot(), wallet),
                (status, _) => {
                    debug!(?status, "Sync skipped: no active session");
                    return;
                }
            }
        };

        let Some(adapter) = self.inner.registry.get(wallet) else {
            debug!(%wallet, "Sync skipped: adapter unavailable");
            return;
        };

        self.sync_with(adapter.as_ref(), token).await;
    }

    /// Refresh identity fields. Never changes `status` and never fails.
    async fn sync_with(&self, adapter: &dyn WalletAdapter, token: EpochToken) {
        let accounts = adapter.get_accounts().await;

        let chain_hex = match adapter.as_evm() {
            Some(evm) => match evm.get_chain_id().await {
                Ok(hex) => Some(hex),
                Err(e) => {
                    debug!(error = %e, "Chain id read failed during sync");
                    None
                }
            },
            None => None,
        };

        let mut state = self.inner.state.lock();
        if self.inner.epoch.is_stale(token) {
            debug!(epoch = %token, "Discarding stale sync result");
            return;
        }

        // Accounts only move while connected, so `account == accounts[0]` holds
        if state.status == SessionStatus::Connected && !accounts.is_empty() {
            state.account = accounts.first().cloned();
            state.previous_account = state.account.clone();
            state.accounts = accounts;
        }

        if let Some(hex) = chain_hex {
            apply_chain(&mut state, hex);
        }
    }

    fn handle_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts),
            WalletEvent::ChainChanged(hex) => self.on_chain_changed(hex),
            WalletEvent::Disconnect(info) => self.on_disconnect(info),
        }
    }

    fn on_accounts_changed(&self, accounts: Vec<String>) {
        let Some(new_account) = accounts.first().cloned() else {
            info!("Wallet reported no accounts");
            self.disconnect_local();
            return;
        };

        let switched_from = {
            let mut state = self.inner.state.lock();
            if state.status != SessionStatus::Connected {
                debug!(status = ?state.status, "Ignoring accountsChanged outside a session");
                return;
            }

            // Begun under the state lock, so the write below cannot be superseded
            self.inner.epoch.begin();

            let previous = state.account.replace(new_account.clone());
            state.accounts = accounts;
            match previous {
                Some(previous) if previous != new_account => {
                    state.previous_account = Some(previous.clone());
                    Some(previous)
                }
                _ => None,
            }
        };

        if let Some(previous) = switched_from {
            info!(from = %previous, to = %new_account, "Account switched");
            self.inner.notifier.notify(messages::account_switched(&new_account));
        }
    }

    fn on_chain_changed(&self, hex: String) {
        let mut state = self.inner.state.lock();
        self.inner.epoch.begin();

        info!(chain = %hex, "Chain changed");
        apply_chain(&mut state, hex);
    }

    fn on_disconnect(&self, info: DisconnectInfo) {
        info!(code = info.code, message = %info.message, "Provider disconnected");
        self.disconnect_local();
    }

    /// Register one handler for every event kind, replacing any previous set.
    /// Called with the state lock held.
    fn attach_listeners(&self, adapter: Arc<dyn WalletAdapter>) {
        let mut listeners = self.inner.listeners.lock();
        if let Some(previous) = listeners.take() {
            detach(previous);
        }

        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let handler = EventHandler::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                WalletSession { inner }.handle_event(event);
            }
        });

        for kind in WalletEventKind::ALL {
            adapter.on(kind, handler.clone());
        }
        debug!(wallet = %adapter.id(), "Session listeners attached");

        *listeners = Some(AttachedListeners { adapter, handler });
    }

    fn detach_listeners(&self) {
        let previous = self.inner.listeners.lock().take();
        if let Some(previous) = previous {
            detach(previous);
        }
    }
}

fn detach(attached: AttachedListeners) {
    for kind in WalletEventKind::ALL {
        attached.adapter.off(kind, &attached.handler);
    }
    debug!(wallet = %attached.adapter.id(), "Session listeners detached");
}

fn apply_chain(state: &mut SessionState, hex: String) {
    state.chain_id = match ChainId::from_hex(&hex) {
        Ok(chain_id) => Some(chain_id),
        Err(e) => {
            warn!(chain = %hex, error = %e, "Unparseable chain id");
            None
        }
    };
    state.chain_id_hex = Some(hex);
}

impl SessionView for WalletSession {
    fn identity(&self) -> SessionIdentity {
        let state = self.inner.state.lock();
        SessionIdentity {
            account: state.account.clone(),
            chain_id: state.chain_id,
            epoch: self.inner.epoch.current(),
        }
    }
}
