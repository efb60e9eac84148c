//! Difficulty parameter controlling how hard the nonce search is.

use crate::core::hash::DIGEST_BITS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proof-of-work difficulty.
///
/// Controls target strictness via `target = 2^(256 - difficulty)`: each
/// increment halves the target and doubles the expected number of attempts.
/// Values are validated at construction; a difficulty of the full digest
/// width or beyond would shift the target to zero or below and is rejected.
///
/// Every mined block stores the difficulty it was sealed at, so later
/// verification is independent of whatever difficulty the chain has moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u32);

impl Difficulty {
    /// Highest accepted difficulty (one below the digest bit width).
    pub const MAX: u32 = (DIGEST_BITS - 1) as u32;

    /// Create a difficulty, rejecting values outside `0..=MAX`.
    pub fn new(value: u32) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::invalid_difficulty(value, Self::MAX));
        }
        Ok(Self(value))
    }

    /// Get the difficulty value.
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Difficulty {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Difficulty::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_range() {
        assert_eq!(Difficulty::new(0).unwrap().value(), 0);
        assert_eq!(Difficulty::new(8).unwrap().value(), 8);
        assert_eq!(Difficulty::new(255).unwrap().value(), 255);
    }

    #[test]
    fn test_rejects_digest_width_and_beyond() {
        let err = Difficulty::new(256).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDifficulty {
                difficulty: 256,
                max: 255
            }
        ));
        assert!(Difficulty::new(1000).is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Difficulty::new(1).unwrap() < Difficulty::new(2).unwrap());
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let ok: Difficulty = serde_json::from_str("8").unwrap();
        assert_eq!(ok.value(), 8);
        assert!(serde_json::from_str::<Difficulty>("256").is_err());
    }
}
