//! Core types for the proof-of-work protocol.
//!
//! The fundamental pieces every other module builds on: hashes and the
//! digest function, the difficulty parameter and its derived target, nonces,
//! and block headers with their canonical encoding.

mod difficulty;
mod hash;
mod header;
mod nonce;
mod target;

pub use difficulty::Difficulty;
pub use hash::{sha256, BlockHash, DIGEST_BITS, DIGEST_LEN};
pub use header::{BlockHeader, Payload};
pub use nonce::Nonce;
pub use target::Target;
