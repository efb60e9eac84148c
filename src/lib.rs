//! Proof-of-work blockchain core.
//!
//! A block commits to a payload, a timestamp, and the previous block's hash
//! through a SHA-256 proof of work: the miner searches for a nonce whose
//! header digest falls below a difficulty-derived target. The crate provides
//! the header encoding, the mining engine, and a chain container that
//! validates links and proofs, plus an async CPU worker with cancellation
//! and progress reporting.
//!
//! ```no_run
//! use powchain::{Chain, Difficulty};
//!
//! # fn main() -> powchain::Result<()> {
//! let mut chain = Chain::new(Difficulty::new(8)?)?;
//! chain.push("hello".into())?;
//! assert!(chain.verify());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod block;
pub mod chain;
pub mod config;
pub mod core;
pub mod error;
pub mod pow;
pub mod progress;
pub mod worker;

pub use crate::core::{BlockHash, BlockHeader, Difficulty, Nonce, Payload, Target};
pub use block::Block;
pub use chain::Chain;
pub use config::Config;
pub use error::{Error, Result};
pub use pow::{ProofOfWork, Solution};
pub use progress::{HashRate, MiningObserver, MiningProgress};
pub use worker::CpuMiner;

/// Application name.
pub const APP_NAME: &str = "powchain";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
