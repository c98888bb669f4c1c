//! Balance of a user-supplied token contract
//!
//! Guarded twice at commit: by this coordinator's own epoch, and by the
//! session identity `(account, chain, session epoch)` captured at start. The
//! second guard catches session changes that happen while no newer custom
//! fetch was started.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::{ChainId, ErrorKind};
use wallet_config::WalletSettings;

use super::reader::BalanceReader;
use super::FetchOutcome;
use crate::epoch::EpochGuard;
use crate::error_mapper::map_balance_error_kind;
use crate::session::{SessionIdentity, SessionView};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomTokenState {
    /// Address as entered; trimmed only when a fetch starts
    pub contract_address: String,
    pub loading: bool,
    pub balance: Option<String>,
    pub decimals: Option<u8>,
    pub symbol: Option<String>,
    pub error_kind: Option<ErrorKind>,
    /// Fetch epoch at the time of the snapshot
    pub epoch: u64,
}

pub struct CustomTokenBalance {
    reader: Arc<dyn BalanceReader>,
    settings: Arc<WalletSettings>,
    session: Arc<dyn SessionView>,
    epoch: EpochGuard,
    state: Mutex<CustomTokenState>,
}

impl CustomTokenBalance {
    pub fn new(
        reader: Arc<dyn BalanceReader>,
        settings: Arc<WalletSettings>,
        session: Arc<dyn SessionView>,
    ) -> Self {
        Self {
            reader,
            settings,
            session,
            epoch: EpochGuard::new(),
            state: Mutex::new(CustomTokenState::default()),
        }
    }

    pub fn set_contract_address(&self, address: impl Into<String>) {
        self.state.lock().contract_address = address.into();
    }

    /// Clear the address and every result field
    pub fn reset(&self) {
        let mut state = self.state.lock();
        *state = CustomTokenState::default();
    }

    pub fn fetch_epoch(&self) -> u64 {
        self.epoch.current()
    }

    pub fn snapshot(&self) -> CustomTokenState {
        let mut snapshot = self.state.lock().clone();
        snapshot.epoch = self.epoch.current();
        snapshot
    }

    /// Read the configured contract's balance for `account` on `chain_id`
    pub async fn check_balance(&self, account: &str, chain_id: Option<ChainId>) -> FetchOutcome {
        let contract = self.state.lock().contract_address.trim().to_string();
        if contract.is_empty() {
            return self.reject(ErrorKind::ContractAddressRequired);
        }
        let Some(chain_id) = chain_id else {
            return self.reject(ErrorKind::ChainIdRequired);
        };

        let expected = SessionIdentity {
            account: Some(account.to_string()),
            chain_id: Some(chain_id),
            epoch: self.session.identity().epoch,
        };

        let token = {
            let mut state = self.state.lock();
            let token = self.epoch.begin();
            state.loading = true;
            state.error_kind = None;
            state.balance = None;
            state.decimals = None;
            state.symbol = None;
            token
        };

        let endpoint = self.settings.rpc_url(chain_id);
        debug!(%contract, %chain_id, epoch = %token, "Fetching custom token balance");
        let result = self.reader.read_balance(&endpoint, &contract, account).await;

        let mut state = self.state.lock();
        if self.epoch.is_stale(token) {
            debug!(epoch = %token, "Discarding stale custom token result");
            return FetchOutcome::Stale;
        }

        // This fetch still owns the loading flag even if the session moved on
        state.loading = false;

        if self.session.identity() != expected {
            debug!(epoch = %token, "Session changed during custom token fetch; result dropped");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(balance) => {
                info!(%contract, decimals = balance.decimals, "Custom token balance updated");
                state.balance = Some(balance.display_value());
                state.decimals = Some(balance.decimals);
                state.symbol = balance.symbol;
                state.error_kind = None;
            }
            Err(e) => {
                let kind = map_balance_error_kind(&e);
                warn!(%contract, ?kind, error = %e, "Custom token balance read failed");
                state.error_kind = Some(kind);
                state.balance = None;
                state.decimals = None;
                state.symbol = None;
            }
        }
        FetchOutcome::Committed
    }

    fn reject(&self, kind: ErrorKind) -> FetchOutcome {
        self.state.lock().error_kind = Some(kind);
        FetchOutcome::Rejected(kind)
    }
}
