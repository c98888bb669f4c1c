//! Fixed token set balances

use chrono::{DateTime, Utc};
use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::{ChainId, ErrorKind, TokenStatus};
use wallet_config::{token_config, TokenSymbol, WalletSettings};

use super::reader::BalanceReader;
use super::FetchOutcome;
use crate::epoch::EpochGuard;
use crate::error_mapper::map_balance_error_kind;

/// Value shown for tokens not deployed on the active chain
pub const NA_VALUE: &str = "—";
/// Value shown for tokens whose read failed
pub const ERROR_VALUE: &str = "Error";

/// One token's balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRecord {
    pub symbol: TokenSymbol,
    /// Contract address; empty for `na`
    pub address: String,
    pub value: String,
    pub status: TokenStatus,
    pub decimals: u8,
    /// Symbol reported by the contract, else the table symbol; absent for `na` and `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_symbol: Option<String>,
}

impl BalanceRecord {
    fn not_available(symbol: TokenSymbol) -> Self {
        Self {
            symbol,
            address: String::new(),
            value: NA_VALUE.to_string(),
            status: TokenStatus::Na,
            decimals: 0,
            display_symbol: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenBalancesState {
    /// One record per tracked symbol, in tracked order; empty before the first commit
    pub balances: Vec<BalanceRecord>,
    pub loading: bool,
    pub error_kind: Option<ErrorKind>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Fetch epoch at the time of the snapshot
    pub epoch: u64,
}

impl TokenBalancesState {
    pub fn get(&self, symbol: TokenSymbol) -> Option<&BalanceRecord> {
        self.balances.iter().find(|record| record.symbol == symbol)
    }
}

/// Coordinator for the tracked token set
pub struct TokenBalances {
    reader: Arc<dyn BalanceReader>,
    settings: Arc<WalletSettings>,
    epoch: EpochGuard,
    state: Mutex<TokenBalancesState>,
}

impl TokenBalances {
    pub fn new(reader: Arc<dyn BalanceReader>, settings: Arc<WalletSettings>) -> Self {
        Self {
            reader,
            settings,
            epoch: EpochGuard::new(),
            state: Mutex::new(TokenBalancesState::default()),
        }
    }

    /// Current fetch epoch, for use as `expected_epoch`
    pub fn fetch_epoch(&self) -> u64 {
        self.epoch.current()
    }

    pub fn snapshot(&self) -> TokenBalancesState {
        let mut snapshot = self.state.lock().clone();
        snapshot.epoch = self.epoch.current();
        snapshot
    }

    /// Fetch using the current epoch as the expectation
    pub async fn refresh(&self, account: &str, chain_id: Option<ChainId>) -> FetchOutcome {
        self.fetch(account, chain_id, self.fetch_epoch()).await
    }

    /// Fetch every tracked token for `account` on `chain_id`.
    ///
    /// Skipped when `expected_epoch` is no longer current. Per-token read
    /// failures become `error` records; they never fail the batch.
    pub async fn fetch(
        &self,
        account: &str,
        chain_id: Option<ChainId>,
        expected_epoch: u64,
    ) -> FetchOutcome {
        if expected_epoch != self.epoch.current() {
            debug!(expected_epoch, current = self.epoch.current(), "Balance fetch skipped");
            return FetchOutcome::Skipped;
        }

        let Some(chain_id) = chain_id else {
            self.state.lock().error_kind = Some(ErrorKind::ChainIdRequired);
            return FetchOutcome::Rejected(ErrorKind::ChainIdRequired);
        };

        let token = {
            let mut state = self.state.lock();
            let token = self.epoch.begin();
            state.loading = true;
            state.error_kind = None;
            token
        };

        let endpoint = self.settings.rpc_url(chain_id);
        debug!(%chain_id, %endpoint, epoch = %token, "Fetching token balances");

        let reads = self
            .settings
            .balances
            .tracked
            .iter()
            .map(|&symbol| self.read_one(symbol, chain_id, &endpoint, account));
        let balances = join_all(reads).await;

        let mut state = self.state.lock();
        if self.epoch.is_stale(token) {
            debug!(epoch = %token, "Discarding stale token balances");
            return FetchOutcome::Stale;
        }

        info!(
            %chain_id,
            ok = balances.iter().filter(|b| b.status == TokenStatus::Ok).count(),
            total = balances.len(),
            "Token balances updated"
        );
        state.balances = balances;
        state.last_updated = Some(Utc::now());
        state.error_kind = None;
        state.loading = false;
        FetchOutcome::Committed
    }

    async fn read_one(
        &self,
        symbol: TokenSymbol,
        chain_id: ChainId,
        endpoint: &str,
        account: &str,
    ) -> BalanceRecord {
        let Some(config) = token_config(Some(chain_id), symbol) else {
            return BalanceRecord::not_available(symbol);
        };

        match self.reader.read_balance(endpoint, config.address, account).await {
            Ok(balance) => BalanceRecord {
                symbol,
                address: config.address.to_string(),
                value: balance.display_value(),
                status: TokenStatus::Ok,
                decimals: balance.decimals,
                display_symbol: Some(
                    balance
                        .symbol
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| symbol.to_string()),
                ),
            },
            Err(e) => {
                warn!(
                    %symbol,
                    kind = ?map_balance_error_kind(&e),
                    error = %e,
                    "Token balance read failed"
                );
                BalanceRecord {
                    symbol,
                    address: config.address.to_string(),
                    value: ERROR_VALUE.to_string(),
                    status: TokenStatus::Error,
                    decimals: config.decimals,
                    display_symbol: None,
                }
            }
        }
    }

    /// Drop every record and reset flags
    pub fn clear_balances(&self) {
        let mut state = self.state.lock();
        state.balances.clear();
        state.loading = false;
        state.error_kind = None;
        state.last_updated = None;
    }

    pub fn clear_error(&self) {
        self.state.lock().error_kind = None;
    }
}
