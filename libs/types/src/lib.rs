//! # Wallet Session Types
//!
//! Shared type system for the wallet connection manager.
//!
//! ## Design Philosophy
//!
//! - **Closed Sets**: wallet ids, event kinds, statuses and error kinds are enums, never strings
//! - **Typed Payloads**: provider events decode into [`WalletEvent`] before any handler sees them
//! - **Symbolic Errors**: [`ErrorKind`] is what state and UI consume; raw provider text never is
//! - **No Precision Loss**: chain ids are integers, balances are never routed through floats
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{ChainId, WalletEvent, WalletEventKind, WalletId};
//!
//! let wallet: WalletId = "metamask".parse().unwrap();
//! assert_eq!(wallet, WalletId::MetaMask);
//!
//! let chain = ChainId::from_hex("0x61").unwrap();
//! assert_eq!(chain.value(), 97);
//!
//! let event = WalletEvent::decode(
//!     WalletEventKind::ChainChanged,
//!     &serde_json::json!("0x1"),
//! )
//! .unwrap();
//! assert_eq!(event.kind(), WalletEventKind::ChainChanged);
//! ```

pub mod address;
pub mod chain;
pub mod errors;
pub mod events;
pub mod status;
pub mod wallet;

pub use address::short_address;
pub use chain::{ChainId, ChainIdParseError};
pub use errors::ErrorKind;
pub use events::{DisconnectInfo, WalletEvent, WalletEventKind};
pub use status::{SessionStatus, TokenStatus};
pub use wallet::{ChainFamily, UnknownWalletId, WalletId};
