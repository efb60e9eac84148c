//! Proof-of-work nonce.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The integer varied during mining until the header digest meets the target.
///
/// The search domain runs from zero up to [`Nonce::MAX`], a signed 64-bit
/// ceiling that is practically unreachable at any realistic difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Nonce(u64);

impl Nonce {
    /// Upper bound of the nonce search domain.
    pub const MAX: Nonce = Nonce(i64::MAX as u64);

    /// Create a new nonce.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the nonce value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Increment the nonce.
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
