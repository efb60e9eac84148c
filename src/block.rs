//! Sealed blocks: header fields plus proof-of-work results.

use crate::core::{BlockHash, BlockHeader, Difficulty, Nonce, Payload};
use crate::error::Result;
use crate::pow::ProofOfWork;
use crate::progress::{MiningObserver, NullObserver};
use serde::{Deserialize, Serialize};

/// A block whose proof of work has been run to completion.
///
/// Constructed in one step: header fields are fixed, the nonce search runs
/// synchronously, then the winning nonce and digest are stored together with
/// the difficulty snapshot they were mined at. Nothing is mutable afterwards.
///
/// Holding a `Block` does not imply validity: deserialized or externally
/// assembled blocks go through [`Block::verify`] (and the chain's admission
/// check) before they are trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    header: BlockHeader,
    difficulty: Difficulty,
    nonce: Nonce,
    hash: BlockHash,
}

impl Block {
    /// Build a block: stamp the header with the current time and mine it to
    /// completion at `difficulty`.
    pub fn mine(
        payload: Payload,
        previous_hash: Option<BlockHash>,
        difficulty: Difficulty,
    ) -> Result<Self> {
        Self::mine_observed(payload, previous_hash, difficulty, &mut NullObserver)
    }

    /// Like [`Block::mine`], reporting search progress to `observer`.
    pub fn mine_observed(
        payload: Payload,
        previous_hash: Option<BlockHash>,
        difficulty: Difficulty,
        observer: &mut dyn MiningObserver,
    ) -> Result<Self> {
        let header = BlockHeader::now(payload, previous_hash);
        let pow = ProofOfWork::new(&header, difficulty);
        let solution = pow.mine_observed(observer)?;
        Ok(Self {
            header,
            difficulty,
            nonce: solution.nonce,
            hash: solution.hash,
        })
    }

    /// Assemble a block from parts mined elsewhere (a worker, a wire
    /// message). The result is unvalidated; callers gate it with
    /// [`Block::verify`] or chain admission.
    pub fn from_parts(
        header: BlockHeader,
        difficulty: Difficulty,
        nonce: Nonce,
        hash: BlockHash,
    ) -> Self {
        Self {
            header,
            difficulty,
            nonce,
            hash,
        }
    }

    /// Re-derive and check the proof of work.
    ///
    /// The digest is recomputed from the stored header, difficulty snapshot
    /// and nonce; it must equal the stored hash and meet the stored
    /// difficulty's target. The hash-equality half makes tampering with any
    /// header field detectable even at difficulty zero, where the target
    /// alone would accept every digest.
    pub fn verify(&self) -> bool {
        let pow = ProofOfWork::new(&self.header, self.difficulty);
        let digest = pow.digest_for(self.nonce);
        digest == self.hash && pow.target().is_met_by(&digest)
    }

    /// The header the proof was computed over.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Application data carried by the block.
    pub fn payload(&self) -> &Payload {
        self.header.payload()
    }

    /// Hash of the preceding block, absent for genesis.
    pub fn previous_hash(&self) -> Option<&BlockHash> {
        self.header.previous_hash()
    }

    /// Creation time in seconds since epoch.
    pub fn timestamp(&self) -> i64 {
        self.header.timestamp()
    }

    /// Difficulty snapshot the block was mined at.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The winning nonce.
    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    /// The accepted proof-of-work digest.
    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }
}
