//! Asynchronous CPU mining on top of the synchronous engine.
//!
//! The search itself is a blocking CPU loop, so it runs on a blocking
//! thread in nonce batches. Cancellation is honored between batches and a
//! progress snapshot is sent per batch when a channel is provided.

use crate::core::{BlockHeader, Difficulty, Nonce};
use crate::error::{Error, Result};
use crate::pow::{ProofOfWork, Solution};
use crate::progress::MiningProgress;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span};

/// Nonces scanned per batch before cancellation and progress checks.
pub const DEFAULT_BATCH_SIZE: u64 = 100_000;

/// CPU mining worker.
#[derive(Debug, Clone)]
pub struct CpuMiner {
    batch_size: u64,
}

impl CpuMiner {
    /// Create a miner scanning `batch_size` nonces between cancellation
    /// checks. Zero selects [`DEFAULT_BATCH_SIZE`].
    pub fn new(batch_size: u64) -> Self {
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        Self { batch_size }
    }

    /// Nonces scanned between cancellation checks.
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Mine `header` at `difficulty` on a blocking thread.
    ///
    /// Stops with [`Error::Cancelled`] when `cancel` fires (checked between
    /// batches), with [`Error::SearchExhausted`] if the nonce domain runs
    /// out, and sends a [`MiningProgress`] snapshot per completed batch when
    /// `progress` is provided.
    pub async fn mine(
        &self,
        header: BlockHeader,
        difficulty: Difficulty,
        cancel: CancellationToken,
        progress: Option<mpsc::UnboundedSender<MiningProgress>>,
    ) -> Result<Solution> {
        let batch_size = self.batch_size;
        info!(difficulty = %difficulty, batch_size, "starting cpu mining");

        let handle = task::spawn_blocking(move || {
            let _span = info_span!("cpu_mine", difficulty = %difficulty).entered();
            let pow = ProofOfWork::new(&header, difficulty);
            let started = Instant::now();
            let mut cursor = 0u64;

            loop {
                if cancel.is_cancelled() {
                    debug!(attempts = cursor, "mining cancelled");
                    return Err(Error::cancelled("cpu mining"));
                }

                if let Some((nonce, hash)) = pow.search(Nonce::new(cursor), batch_size) {
                    return Ok(Solution {
                        nonce,
                        hash,
                        attempts: nonce.value() + 1,
                        elapsed: started.elapsed(),
                    });
                }

                cursor = cursor.saturating_add(batch_size);
                if cursor > pow.ceiling().value() {
                    return Err(Error::search_exhausted(
                        pow.ceiling().value() + 1,
                        difficulty.value(),
                    ));
                }

                if let Some(tx) = &progress {
                    let _ = tx.send(MiningProgress {
                        attempts: cursor,
                        current_nonce: Nonce::new(cursor),
                        elapsed: started.elapsed(),
                    });
                }
            }
        });

        let solution = handle
            .await
            .map_err(|e| Error::worker(format!("mining task failed: {}", e)))??;

        info!(
            nonce = %solution.nonce,
            attempts = solution.attempts,
            hash_rate = %solution.hash_rate(),
            "cpu mining found solution"
        );
        Ok(solution)
    }
}

impl Default for CpuMiner {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Payload;

    fn difficulty(value: u32) -> Difficulty {
        Difficulty::new(value).unwrap()
    }

    fn header(payload: &str) -> BlockHeader {
        BlockHeader::new(1_700_000_000, Payload::from(payload), None)
    }

    #[test]
    fn test_zero_batch_size_falls_back_to_default() {
        assert_eq!(CpuMiner::new(0).batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(CpuMiner::new(64).batch_size(), 64);
    }

    #[tokio::test]
    async fn test_easy_mining_finds_first_nonce() {
        let miner = CpuMiner::new(1_000);
        let solution = miner
            .mine(
                header("easy"),
                difficulty(0),
                CancellationToken::new(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(solution.nonce, Nonce::new(0));
        assert_eq!(solution.attempts, 1);
    }

    #[tokio::test]
    async fn test_solution_matches_synchronous_engine() {
        let header = header("parity");
        let miner = CpuMiner::new(1_000);
        let from_worker = miner
            .mine(
                header.clone(),
                difficulty(8),
                CancellationToken::new(),
                None,
            )
            .await
            .unwrap();

        let pow = ProofOfWork::new(&header, difficulty(8));
        let from_engine = pow.mine().unwrap();
        assert_eq!(from_worker.nonce, from_engine.nonce);
        assert_eq!(from_worker.hash, from_engine.hash);
    }

    #[tokio::test]
    async fn test_cancellation_stops_mining() {
        let miner = CpuMiner::new(64);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = miner
            .mine(header("unminable"), difficulty(200), cancel, None)
            .await;
        assert!(matches!(result.unwrap_err(), Error::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_progress_is_reported_while_mining() {
        let miner = CpuMiner::new(64);
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let task = {
            let cancel = cancel.clone();
            let header = header("unminable");
            tokio::spawn(async move {
                miner
                    .mine(header, difficulty(200), cancel, Some(tx))
                    .await
            })
        };

        // Let a few batches complete, then stop the search.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        cancel.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result.unwrap_err(), Error::Cancelled { .. }));

        let first = rx.recv().await.expect("at least one progress snapshot");
        assert_eq!(first.attempts, 64);
        assert_eq!(first.current_nonce, Nonce::new(64));
    }
}
