//! Append-only chain of proof-of-work blocks.

use crate::block::Block;
use crate::core::{Difficulty, Payload};
use crate::error::{Error, Result};
use crate::progress::{MiningObserver, NullObserver};
use serde::Serialize;
use tracing::debug;

/// Payload carried by the genesis block.
pub const GENESIS_PAYLOAD: &[u8] = b"First block";

/// An ordered, append-only sequence of blocks.
///
/// Always non-empty: construction mines (or admits) a genesis block, and no
/// operation removes or reorders blocks. Every non-genesis block's previous
/// hash equals the hash of the block before it.
///
/// The chain's difficulty applies to blocks mined from now on; each block
/// keeps the snapshot it was actually mined at, so raising the difficulty
/// never invalidates history.
#[derive(Debug, Clone, Serialize)]
pub struct Chain {
    blocks: Vec<Block>,
    difficulty: Difficulty,
}

impl Chain {
    /// Create a chain by mining the genesis block at `difficulty`.
    pub fn new(difficulty: Difficulty) -> Result<Self> {
        let genesis = Block::mine(Payload::from(GENESIS_PAYLOAD), None, difficulty)?;
        Self::from_genesis(genesis)
    }

    /// Create a chain around an externally mined genesis block.
    pub fn from_genesis(genesis: Block) -> Result<Self> {
        if genesis.previous_hash().is_some() {
            return Err(Error::invalid_block(
                "genesis block must not reference a predecessor",
            ));
        }
        if !genesis.verify() {
            return Err(Error::invalid_block(
                "genesis proof of work does not verify",
            ));
        }
        let difficulty = genesis.difficulty();
        Ok(Self {
            blocks: vec![genesis],
            difficulty,
        })
    }

    /// Mine a block carrying `payload` at the current difficulty and append
    /// it.
    pub fn push(&mut self, payload: Payload) -> Result<&Block> {
        self.push_observed(payload, &mut NullObserver)
    }

    /// Like [`Chain::push`], reporting search progress to `observer`.
    pub fn push_observed(
        &mut self,
        payload: Payload,
        observer: &mut dyn MiningObserver,
    ) -> Result<&Block> {
        let previous = *self.last().hash();
        let block = Block::mine_observed(payload, Some(previous), self.difficulty, observer)?;
        debug!(hash = %block.hash(), nonce = %block.nonce(), "block sealed");
        self.blocks.push(block);
        Ok(self.last())
    }

    /// Append a block mined elsewhere.
    ///
    /// The block must link to the current tip and carry a valid proof of
    /// work; otherwise it is rejected and the chain is left untouched.
    pub fn append(&mut self, block: Block) -> Result<&Block> {
        if block.previous_hash() != Some(self.last().hash()) {
            return Err(Error::invalid_block(
                "previous hash does not match the chain tip",
            ));
        }
        if !block.verify() {
            return Err(Error::invalid_block("proof of work does not verify"));
        }
        self.blocks.push(block);
        Ok(self.last())
    }

    /// Validate the whole chain: genesis shape, pairwise links and every
    /// block's proof of work (each at its stored difficulty).
    pub fn verify(&self) -> bool {
        let Some(genesis) = self.blocks.first() else {
            return false;
        };
        if genesis.previous_hash().is_some() || !genesis.verify() {
            return false;
        }
        for pair in self.blocks.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if current.previous_hash() != Some(previous.hash()) {
                return false;
            }
            if !current.verify() {
                return false;
            }
        }
        true
    }

    /// The most recently appended block.
    pub fn last(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always contains a genesis block")
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for container-interface completeness.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Difficulty applied to blocks mined from now on.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Change the difficulty for future blocks. Already-mined blocks keep
    /// their own snapshots.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{sha256, BlockHeader, Nonce};

    fn difficulty(value: u32) -> Difficulty {
        Difficulty::new(value).unwrap()
    }

    #[test]
    fn test_new_chain_has_genesis() {
        let chain = Chain::new(difficulty(0)).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
        assert!(chain.last().previous_hash().is_none());
        assert_eq!(chain.last().payload().as_bytes(), GENESIS_PAYLOAD);
        assert!(chain.verify());
    }

    #[test]
    fn test_push_links_blocks() {
        let mut chain = Chain::new(difficulty(0)).unwrap();
        chain.push(Payload::from("a")).unwrap();
        chain.push(Payload::from("b")).unwrap();

        assert_eq!(chain.len(), 3);
        for pair in chain.blocks().windows(2) {
            assert_eq!(pair[1].previous_hash(), Some(pair[0].hash()));
        }
        assert!(chain.verify());
    }

    #[test]
    fn test_append_accepts_externally_mined_block() {
        let mut chain = Chain::new(difficulty(0)).unwrap();
        let tip = *chain.last().hash();
        let block = Block::mine(Payload::from("external"), Some(tip), difficulty(0)).unwrap();
        chain.append(block).unwrap();
        assert_eq!(chain.len(), 2);
        assert!(chain.verify());
    }

    #[test]
    fn test_append_rejects_unlinked_block() {
        let mut chain = Chain::new(difficulty(0)).unwrap();
        let stranger =
            Block::mine(Payload::from("orphan"), Some(sha256(b"elsewhere")), difficulty(0))
                .unwrap();
        let err = chain.append(stranger).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock { .. }));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_append_rejects_invalid_proof() {
        let mut chain = Chain::new(difficulty(0)).unwrap();
        let tip = *chain.last().hash();
        let header = BlockHeader::now(Payload::from("forged"), Some(tip));
        let forged = Block::from_parts(header, difficulty(0), Nonce::new(0), sha256(b"wrong"));
        let err = chain.append(forged).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock { .. }));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_from_genesis_rejects_linked_block() {
        let linked =
            Block::mine(Payload::from("not genesis"), Some(sha256(b"p")), difficulty(0)).unwrap();
        assert!(matches!(
            Chain::from_genesis(linked),
            Err(Error::InvalidBlock { .. })
        ));
    }

    #[test]
    fn test_set_difficulty_affects_future_blocks_only() {
        let mut chain = Chain::new(difficulty(0)).unwrap();
        chain.push(Payload::from("easy")).unwrap();

        chain.set_difficulty(difficulty(2));
        chain.push(Payload::from("harder")).unwrap();

        let blocks = chain.blocks();
        assert_eq!(blocks[1].difficulty().value(), 0);
        assert_eq!(blocks[2].difficulty().value(), 2);
        assert!(chain.verify());
    }

    #[test]
    fn test_verify_spots_rewritten_history() {
        let mut chain = Chain::new(difficulty(0)).unwrap();
        chain.push(Payload::from("a")).unwrap();
        chain.push(Payload::from("b")).unwrap();

        // Rebuild the middle block with a different payload but the original
        // proof; the chain must notice.
        let victim = &chain.blocks()[1];
        let forged_header = BlockHeader::new(
            victim.timestamp(),
            Payload::from("rewritten"),
            victim.previous_hash().copied(),
        );
        let forged = Block::from_parts(
            forged_header,
            victim.difficulty(),
            victim.nonce(),
            *victim.hash(),
        );

        let mut tampered = chain.clone();
        tampered.blocks[1] = forged;
        assert!(!tampered.verify());
        assert!(chain.verify());
    }

    #[test]
    fn test_chain_serializes_to_json() {
        let mut chain = Chain::new(difficulty(0)).unwrap();
        chain.push(Payload::from("a")).unwrap();
        let value: serde_json::Value = serde_json::to_value(&chain).unwrap();
        assert_eq!(value["blocks"].as_array().unwrap().len(), 2);
        assert_eq!(value["difficulty"], 0);
    }
}
