//! Block headers and their canonical proof-of-work encoding.

use crate::core::difficulty::Difficulty;
use crate::core::hash::{BlockHash, DIGEST_LEN};
use crate::core::nonce::Nonce;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque application data carried by a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Create a payload from raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the payload carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// The data a block's proof of work is computed over.
///
/// All fields are fixed before mining begins; the search varies only the
/// auxiliary nonce. `previous_hash` is absent for the genesis block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    timestamp: i64,
    payload: Payload,
    previous_hash: Option<BlockHash>,
}

impl BlockHeader {
    /// Create a header with an explicit timestamp (seconds since epoch).
    pub fn new(timestamp: i64, payload: Payload, previous_hash: Option<BlockHash>) -> Self {
        Self {
            timestamp,
            payload,
            previous_hash,
        }
    }

    /// Create a header stamped with the current time.
    pub fn now(payload: Payload, previous_hash: Option<BlockHash>) -> Self {
        Self::new(chrono::Utc::now().timestamp(), payload, previous_hash)
    }

    /// Creation time in seconds since epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Application data carried by the block.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Hash of the preceding block, absent for genesis.
    pub fn previous_hash(&self) -> Option<&BlockHash> {
        self.previous_hash.as_ref()
    }

    /// Encode the header with a candidate nonce into the canonical byte
    /// sequence the proof-of-work digest is computed over.
    ///
    /// Fields are concatenated in fixed order with no delimiters: previous
    /// hash bytes, payload bytes, then lowercase minimal hexadecimal text of
    /// the timestamp, difficulty and nonce. The encoding is deterministic and
    /// platform independent.
    ///
    /// Known limitation: because the numeric renderings are variable width
    /// and nothing separates the fields, distinct field splits can yield the
    /// same byte sequence (a payload ending in a hex digit can absorb part of
    /// the timestamp, and vice versa). The format is kept as is for
    /// compatibility with chains encoded this way.
    pub fn encode(&self, difficulty: Difficulty, nonce: Nonce) -> Vec<u8> {
        let timestamp = hex_i64(self.timestamp);
        let difficulty = format!("{:x}", difficulty.value());
        let nonce = format!("{:x}", nonce.value());

        let mut merged = Vec::with_capacity(
            self.previous_hash.map_or(0, |_| DIGEST_LEN)
                + self.payload.len()
                + timestamp.len()
                + difficulty.len()
                + nonce.len(),
        );
        if let Some(previous) = &self.previous_hash {
            merged.extend_from_slice(previous.as_bytes());
        }
        merged.extend_from_slice(self.payload.as_bytes());
        merged.extend_from_slice(timestamp.as_bytes());
        merged.extend_from_slice(difficulty.as_bytes());
        merged.extend_from_slice(nonce.as_bytes());
        merged
    }
}

/// Render a signed integer as lowercase minimal hex, sign first for negative
/// values (`-255` becomes `-ff`). Matches the text form used when the chain
/// format was fixed.
fn hex_i64(value: i64) -> String {
    if value < 0 {
        format!("-{:x}", value.unsigned_abs())
    } else {
        format!("{:x}", value)
    }
}
