//! Difficulty targets compared against header digests.

use crate::core::difficulty::Difficulty;
use crate::core::hash::{BlockHash, DIGEST_BITS};
use num_bigint::BigUint;
use num_traits::One;
use std::fmt;

/// The numeric threshold a header digest must fall strictly below.
///
/// Derived as `2^(256 - difficulty)`. Difficulty zero yields `2^256`, one
/// past the largest representable digest, so every digest satisfies it and
/// mining succeeds on the first nonce. The arbitrary-precision representation
/// exists precisely so that maximal target needs no special-casing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target(BigUint);

impl Target {
    /// Derive the target for a difficulty.
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self(BigUint::one() << (DIGEST_BITS - difficulty.value() as usize))
    }

    /// Check whether a digest meets this target.
    ///
    /// The digest bytes are read as a big-endian unsigned integer and must be
    /// strictly less than the target.
    pub fn is_met_by(&self, hash: &BlockHash) -> bool {
        BigUint::from_bytes_be(hash.as_bytes()) < self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}
