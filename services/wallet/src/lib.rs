//! Wallet Service
//!
//! Connection manager for EVM browser wallets. Tracks connection status,
//! active account, active chain and token balances while discarding the
//! results of superseded async operations.
//!
//! Features:
//! - Epoch guards: generation counters that drop late results instead of cancelling
//! - Wallet adapters over EIP-1193 providers, resolved through a memoized registry
//! - Session state machine driven by caller operations and provider events alike
//! - Fixed-set and custom-contract balance coordinators with exact integer formatting
//! - Symbolic error kinds; raw provider text only reaches the log

pub mod adapter;
pub mod balances;
pub mod epoch;
pub mod error;
pub mod error_mapper;
pub mod messages;
pub mod notify;
pub mod provider;
pub mod session;

pub use adapter::{AdapterRegistry, EventHandler, EvmWalletAdapter, MetaMaskAdapter, WalletAdapter};
pub use balances::{
    format_units, BalanceReader, BalanceRecord, CustomTokenBalance, CustomTokenState,
    FetchOutcome, RawBalance, TokenBalances, TokenBalancesState, Web3BalanceReader,
};
pub use epoch::{EpochGuard, EpochToken};
pub use error::{ProviderRpcError, Result, WalletError};
pub use error_mapper::{is_user_rejection, map_error_kind};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use provider::{
    resolve_metamask, Eip1193Provider, HttpProvider, InjectedProvider, ProviderListener,
    ProviderSlot,
};
pub use session::{ConnectOutcome, SessionIdentity, SessionState, SessionView, WalletSession};
