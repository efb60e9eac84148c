//! Block hashes and the digest function sealing them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Size of a block hash in bytes (SHA-256).
pub const DIGEST_LEN: usize = 32;

/// Width of a block hash in bits.
pub const DIGEST_BITS: usize = DIGEST_LEN * 8;

/// A 256-bit block hash.
///
/// Produced by hashing an encoded header and compared against a [`Target`]
/// by reading the bytes as a big-endian unsigned integer.
///
/// [`Target`]: crate::core::Target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash([u8; DIGEST_LEN]);

impl BlockHash {
    /// Create a block hash from raw digest bytes.
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw digest bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Convert to a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hexadecimal string (64 chars).
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::hash(format!("Invalid hex in block hash: {}", e)))?;
        let bytes: [u8; DIGEST_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            Error::hash(format!(
                "Invalid block hash length: expected {} bytes, got {}",
                DIGEST_LEN,
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl FromStr for BlockHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for BlockHash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BlockHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> BlockHash {
    BlockHash(Sha256::digest(data).into())
}
