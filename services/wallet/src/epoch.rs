//! Generation counter for discarding superseded async results
//!
//! Each logical state group owns one [`EpochGuard`]. An operation calls
//! [`EpochGuard::begin`] before its first await and keeps the returned
//! [`EpochToken`]. After every await it checks [`EpochGuard::is_stale`]; once
//! a later operation has begun, the earlier one must not write anything.
//!
//! The counter only moves forward, so a token is never reissued.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Commit token handed out by [`EpochGuard::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EpochToken(u64);

impl EpochToken {
    /// Raw counter value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EpochToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared monotonic counter for one state group
#[derive(Debug, Clone, Default)]
pub struct EpochGuard {
    counter: Arc<AtomicU64>,
}

impl EpochGuard {
    /// Counter starting at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an operation: increment and return the new value
    pub fn begin(&self) -> EpochToken {
        EpochToken(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True when another operation began after `token` was issued
    pub fn is_stale(&self, token: EpochToken) -> bool {
        self.current() != token.0
    }

    /// Current counter value
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Current value as a token, without starting an operation
    pub fn snapshot(&self) -> EpochToken {
        EpochToken(self.current())
    }
}
