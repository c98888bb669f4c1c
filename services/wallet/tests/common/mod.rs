//! Shared fixtures: a scriptable injected wallet and a scriptable balance reader

#![allow(dead_code)]

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use wallet_service::{
    AdapterRegistry, BalanceReader, ChannelNotifier, InjectedProvider, Notification,
    ProviderRpcError, ProviderSlot, RawBalance, SessionIdentity, SessionView, WalletSession,
};
use web3::types::U256;

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";
pub const CAROL: &str = "0x3333333333333333333333333333333333333333";

pub type ConnectReply = Result<Vec<String>, ProviderRpcError>;
pub type ChainReply = Result<String, ProviderRpcError>;

/// Injected MetaMask whose `eth_requestAccounts` replies can be held back
pub struct MockWallet {
    pub provider: Arc<InjectedProvider>,
    accounts: Arc<Mutex<Vec<String>>>,
    chain: Arc<Mutex<Option<String>>>,
    pending: Arc<Mutex<VecDeque<oneshot::Receiver<ConnectReply>>>>,
    pending_chain: Arc<Mutex<VecDeque<oneshot::Receiver<ChainReply>>>>,
}

impl MockWallet {
    pub fn new(accounts: &[&str], chain_hex: &str) -> Self {
        let accounts = Arc::new(Mutex::new(
            accounts.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
        ));
        let chain = Arc::new(Mutex::new(Some(chain_hex.to_string())));
        let pending: Arc<Mutex<VecDeque<oneshot::Receiver<ConnectReply>>>> =
            Arc::new(Mutex::new(VecDeque::new()));
        let pending_chain: Arc<Mutex<VecDeque<oneshot::Receiver<ChainReply>>>> =
            Arc::new(Mutex::new(VecDeque::new()));

        let (acc, ch, queue, chain_queue) = (
            accounts.clone(),
            chain.clone(),
            pending.clone(),
            pending_chain.clone(),
        );
        let provider = InjectedProvider::metamask().with_handler(move |method, _params| {
            let current = acc.lock().clone();
            let chain = ch.lock().clone();
            let deferred = if method == "eth_requestAccounts" {
                queue.lock().pop_front()
            } else {
                None
            };
            let deferred_chain = if method == "eth_chainId" {
                chain_queue.lock().pop_front()
            } else {
                None
            };

            async move {
                match method.as_str() {
                    "eth_requestAccounts" => {
                        let reply = match deferred {
                            Some(rx) => rx
                                .await
                                .unwrap_or_else(|_| Err(ProviderRpcError::message("reply dropped"))),
                            None => Ok(current),
                        };
                        reply.map(|accounts| json!(accounts))
                    }
                    "eth_accounts" => Ok(json!(current)),
                    "eth_chainId" => {
                        let reply = match deferred_chain {
                            Some(rx) => rx
                                .await
                                .unwrap_or_else(|_| Err(ProviderRpcError::message("reply dropped"))),
                            None => chain
                                .ok_or_else(|| ProviderRpcError::new(-32603, "could not get chain")),
                        };
                        reply.map(Value::String)
                    }
                    other => Err(ProviderRpcError::new(4200, format!("unsupported method {}", other))),
                }
            }
            .boxed()
        });

        Self {
            provider: Arc::new(provider),
            accounts,
            chain,
            pending,
            pending_chain,
        }
    }

    pub fn slot(&self) -> ProviderSlot {
        ProviderSlot::with_provider(self.provider.clone())
    }

    /// Hold back the next `eth_requestAccounts` until the sender fires
    pub fn defer_connect(&self) -> oneshot::Sender<ConnectReply> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push_back(rx);
        tx
    }

    /// Hold back the next `eth_chainId` until the sender fires
    pub fn defer_chain(&self) -> oneshot::Sender<ChainReply> {
        let (tx, rx) = oneshot::channel();
        self.pending_chain.lock().push_back(rx);
        tx
    }

    /// Make the next `eth_requestAccounts` fail with `error`
    pub fn fail_next_connect(&self, error: ProviderRpcError) {
        let _ = self.defer_connect().send(Err(error));
    }

    pub fn set_accounts(&self, accounts: &[&str]) {
        *self.accounts.lock() = accounts.iter().map(|a| a.to_string()).collect();
    }

    pub fn set_chain(&self, chain_hex: Option<&str>) {
        *self.chain.lock() = chain_hex.map(str::to_string);
    }

    pub fn emit_accounts(&self, accounts: &[&str]) {
        self.provider.emit("accountsChanged", json!(accounts));
    }

    pub fn emit_chain(&self, chain_hex: &str) {
        self.provider.emit("chainChanged", json!(chain_hex));
    }

    pub fn emit_disconnect(&self) {
        self.provider
            .emit("disconnect", json!({"code": 4900, "message": "Disconnected"}));
    }
}

pub fn session_for(slot: ProviderSlot) -> (WalletSession, mpsc::UnboundedReceiver<Notification>) {
    let registry = Arc::new(AdapterRegistry::new(slot));
    let (notifier, rx) = ChannelNotifier::new();
    (WalletSession::new(registry, Arc::new(notifier)), rx)
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<String> {
    let mut titles = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        titles.push(notification.title);
    }
    titles
}

pub type ReadReply = Result<RawBalance, ProviderRpcError>;

/// Balance reader with per-contract canned replies and optional hold-back
#[derive(Default)]
pub struct MockReader {
    calls: Mutex<Vec<(String, String, String)>>,
    replies: Mutex<HashMap<String, ReadReply>>,
    pending: Mutex<HashMap<String, VecDeque<oneshot::Receiver<ReadReply>>>>,
}

impl MockReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, token: &str, raw: &str, decimals: u8, symbol: Option<&str>) {
        self.replies.lock().insert(
            token.to_lowercase(),
            Ok(RawBalance {
                raw: U256::from_dec_str(raw).unwrap(),
                decimals,
                symbol: symbol.map(str::to_string),
            }),
        );
    }

    pub fn set_error(&self, token: &str, message: &str) {
        self.replies
            .lock()
            .insert(token.to_lowercase(), Err(ProviderRpcError::message(message)));
    }

    /// Hold back the next read of `token` until the sender fires
    pub fn defer(&self, token: &str) -> oneshot::Sender<ReadReply> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .entry(token.to_lowercase())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl BalanceReader for MockReader {
    async fn read_balance(
        &self,
        endpoint: &str,
        token: &str,
        owner: &str,
    ) -> Result<RawBalance, ProviderRpcError> {
        self.calls
            .lock()
            .push((endpoint.to_string(), token.to_string(), owner.to_string()));

        let key = token.to_lowercase();
        let deferred = self
            .pending
            .lock()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());
        if let Some(rx) = deferred {
            return rx
                .await
                .unwrap_or_else(|_| Err(ProviderRpcError::message("reply dropped")));
        }

        self.replies
            .lock()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(ProviderRpcError::message("execution reverted")))
    }
}

/// Session view whose identity tests move by hand
pub struct FakeSession {
    identity: Mutex<SessionIdentity>,
}

impl FakeSession {
    pub fn new(account: &str, chain_id: u64) -> Self {
        Self {
            identity: Mutex::new(SessionIdentity {
                account: Some(account.to_string()),
                chain_id: Some(types::ChainId(chain_id)),
                epoch: 1,
            }),
        }
    }

    pub fn switch_account(&self, account: &str) {
        let mut identity = self.identity.lock();
        identity.account = Some(account.to_string());
        identity.epoch += 1;
    }

    pub fn bump_epoch(&self) {
        self.identity.lock().epoch += 1;
    }
}

impl SessionView for FakeSession {
    fn identity(&self) -> SessionIdentity {
        self.identity.lock().clone()
    }
}
