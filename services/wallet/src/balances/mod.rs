//! # Balance Coordinators
//!
//! Two epoch-guarded pipelines that read session identity and write only
//! their own state:
//!
//! - [`TokenBalances`]: the fixed token set of the active chain, read concurrently
//! - [`CustomTokenBalance`]: one user-supplied contract, additionally guarded
//!   against session drift
//!
//! Raw amounts go through [`format_units`]; nothing is converted to floats.

pub mod custom_token;
pub mod format;
pub mod reader;
pub mod token_set;

pub use custom_token::{CustomTokenBalance, CustomTokenState};
pub use format::format_units;
pub use reader::{parse_address, BalanceReader, RawBalance, Web3BalanceReader};
pub use token_set::{BalanceRecord, TokenBalances, TokenBalancesState};

use types::ErrorKind;

/// What a fetch call did with its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result written to state
    Committed,
    /// A newer fetch or a session change superseded this one; nothing written
    Stale,
    /// Caller's expected epoch was already out of date; nothing started
    Skipped,
    /// Input validation failed; the kind is recorded, the epoch untouched
    Rejected(ErrorKind),
}
