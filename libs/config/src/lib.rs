//! # Wallet Configuration
//!
//! Centralized chain, token and RPC tables plus layered runtime settings for
//! the wallet service.
//!
//! ## Features
//!
//! - **Chain Metadata**: names and testnet flags for supported chains
//! - **Token Table**: per-chain contracts for the fixed USDC/USDT set
//! - **RPC Endpoints**: public endpoints with a default fallback
//! - **Settings**: defaults, TOML file and `WALLET__` environment overrides
//!
//! ## Usage
//!
//! ```rust
//! use types::ChainId;
//! use wallet_config::{chain_name, token_config, TokenSymbol, WalletSettings};
//!
//! assert_eq!(chain_name(Some(ChainId(1))), "Ethereum Mainnet");
//! assert!(token_config(Some(ChainId(1)), TokenSymbol::Usdt).is_none());
//!
//! let settings = WalletSettings::default();
//! assert_eq!(settings.rpc_url(ChainId(8453)), "https://mainnet.base.org");
//! ```

pub mod chains;
pub mod rpc;
pub mod settings;
pub mod tokens;

// Re-export commonly used types
pub use chains::{chain_config, chain_name, is_supported_chain, ChainConfig, CHAINS};
pub use rpc::{rpc_url, DEFAULT_RPC_URL};
pub use settings::{BalanceSettings, RpcSettings, WalletSettings, DEFAULT_FALLBACK_DECIMALS};
pub use tokens::{token_address, token_config, tokens_for_chain, TokenConfig, TokenSymbol};
