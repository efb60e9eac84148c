//! The proof-of-work engine: nonce search and proof validation.
//!
//! An engine is constructed per block over that block's header fields and a
//! difficulty snapshot. Mining scans nonces from zero until the header digest
//! falls strictly below the difficulty target; validation re-derives the
//! digest for a claimed nonce and re-checks the same predicate.

use crate::core::{sha256, BlockHash, BlockHeader, Difficulty, Nonce, Target};
use crate::error::{Error, Result};
use crate::progress::{MiningObserver, MiningProgress, NullObserver};
use std::time::{Duration, Instant};
use tracing::debug;

/// Nonces scanned between progress reports during [`ProofOfWork::mine_observed`].
pub const PROGRESS_STRIDE: u64 = 10_000;

/// Result of a successful nonce search.
#[derive(Debug, Clone)]
pub struct Solution {
    /// The winning nonce.
    pub nonce: Nonce,
    /// Digest of the header encoded with the winning nonce.
    pub hash: BlockHash,
    /// Nonces tried, the winning one included.
    pub attempts: u64,
    /// Wall-clock duration of the search.
    pub elapsed: Duration,
}

impl Solution {
    /// Effective search rate.
    pub fn hash_rate(&self) -> crate::progress::HashRate {
        MiningProgress {
            attempts: self.attempts,
            current_nonce: self.nonce,
            elapsed: self.elapsed,
        }
        .hash_rate()
    }
}

/// Proof-of-work engine for a single block.
///
/// Holds a reference to the header fields, the difficulty snapshot in effect
/// and the target derived from it. Nothing is mutated after construction;
/// the search keeps its cursor local.
#[derive(Debug)]
pub struct ProofOfWork<'a> {
    header: &'a BlockHeader,
    difficulty: Difficulty,
    target: Target,
    ceiling: Nonce,
}

impl<'a> ProofOfWork<'a> {
    /// Create an engine for a header at the given difficulty.
    ///
    /// The difficulty was range-checked at construction, so target
    /// derivation cannot fail here.
    pub fn new(header: &'a BlockHeader, difficulty: Difficulty) -> Self {
        Self::with_ceiling(header, difficulty, Nonce::MAX)
    }

    /// Create an engine whose search stops after `ceiling` (inclusive).
    ///
    /// The default ceiling is practically unreachable; a lower one makes
    /// exhaustion observable.
    pub fn with_ceiling(header: &'a BlockHeader, difficulty: Difficulty, ceiling: Nonce) -> Self {
        Self {
            header,
            difficulty,
            target: Target::from_difficulty(difficulty),
            ceiling,
        }
    }

    /// The difficulty snapshot this engine was built with.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The numeric target digests must fall below.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Last nonce the search will try.
    pub fn ceiling(&self) -> Nonce {
        self.ceiling
    }

    /// Digest of the header encoded with `nonce`.
    pub fn digest_for(&self, nonce: Nonce) -> BlockHash {
        sha256(&self.header.encode(self.difficulty, nonce))
    }

    /// Check a claimed nonce against the target.
    ///
    /// Pure re-derivation; returns whether the digest meets the target and
    /// never fails.
    pub fn validate(&self, nonce: Nonce) -> bool {
        self.target.is_met_by(&self.digest_for(nonce))
    }

    /// Scan up to `attempts` nonces starting at `start`, stopping early at
    /// the ceiling. Returns the first satisfying nonce and its digest.
    pub fn search(&self, start: Nonce, attempts: u64) -> Option<(Nonce, BlockHash)> {
        let mut nonce = start;
        let mut scanned = 0u64;
        while scanned < attempts && nonce <= self.ceiling {
            let hash = self.digest_for(nonce);
            if self.target.is_met_by(&hash) {
                return Some((nonce, hash));
            }
            nonce.increment();
            scanned += 1;
        }
        None
    }

    /// Mine: search from nonce zero until a digest meets the target.
    ///
    /// Returns [`Error::SearchExhausted`] if the ceiling is reached without
    /// a solution.
    pub fn mine(&self) -> Result<Solution> {
        self.mine_observed(&mut NullObserver)
    }

    /// Mine, reporting a progress snapshot to `observer` every
    /// [`PROGRESS_STRIDE`] attempts.
    pub fn mine_observed(&self, observer: &mut dyn MiningObserver) -> Result<Solution> {
        debug!(
            difficulty = %self.difficulty,
            payload = %self.header.payload(),
            "starting nonce search"
        );
        let started = Instant::now();
        let mut cursor = Nonce::new(0);
        loop {
            if let Some((nonce, hash)) = self.search(cursor, PROGRESS_STRIDE) {
                let solution = Solution {
                    nonce,
                    hash,
                    attempts: nonce.value() + 1,
                    elapsed: started.elapsed(),
                };
                debug!(
                    nonce = %solution.nonce,
                    hash = %solution.hash,
                    attempts = solution.attempts,
                    "solution found"
                );
                return Ok(solution);
            }

            let next = cursor.value().saturating_add(PROGRESS_STRIDE);
            if next > self.ceiling.value() {
                return Err(Error::search_exhausted(
                    self.ceiling.value() + 1,
                    self.difficulty.value(),
                ));
            }
            cursor = Nonce::new(next);
            observer.on_progress(&MiningProgress {
                attempts: next,
                current_nonce: cursor,
                elapsed: started.elapsed(),
            });
        }
    }
}
