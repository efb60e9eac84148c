//! Progress reporting for long-running nonce searches.
//!
//! The search loop stays free of console output; it hands periodic
//! [`MiningProgress`] snapshots to a [`MiningObserver`] instead, so the core
//! can run headless and callers choose how to surface progress.

use crate::core::Nonce;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Hash rate in hashes per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct HashRate(pub f64);

impl HashRate {
    /// Get the rate value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for HashRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1_000_000_000.0 {
            write!(f, "{:.2}G H/s", self.0 / 1_000_000_000.0)
        } else if self.0 >= 1_000_000.0 {
            write!(f, "{:.2}M H/s", self.0 / 1_000_000.0)
        } else if self.0 >= 1_000.0 {
            write!(f, "{:.2}K H/s", self.0 / 1_000.0)
        } else {
            write!(f, "{:.2} H/s", self.0)
        }
    }
}

/// Snapshot of a running nonce search.
#[derive(Debug, Clone, Copy)]
pub struct MiningProgress {
    /// Nonces tried so far.
    pub attempts: u64,
    /// Next nonce the search will try.
    pub current_nonce: Nonce,
    /// Time since the search started.
    pub elapsed: Duration,
}

impl MiningProgress {
    /// Effective search rate over the elapsed time.
    pub fn hash_rate(&self) -> HashRate {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            HashRate(self.attempts as f64 / secs)
        } else {
            HashRate(0.0)
        }
    }
}

/// Receives periodic snapshots from a nonce search.
pub trait MiningObserver {
    /// Called between search batches with the latest snapshot.
    fn on_progress(&mut self, progress: &MiningProgress);
}

/// Observer that discards all progress. The default for callers that only
/// care about the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl MiningObserver for NullObserver {
    fn on_progress(&mut self, _progress: &MiningProgress) {}
}

/// Observer that emits each snapshot as a structured debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MiningObserver for TracingObserver {
    fn on_progress(&mut self, progress: &MiningProgress) {
        debug!(
            attempts = progress.attempts,
            nonce = %progress.current_nonce,
            hash_rate = %progress.hash_rate(),
            "mining in progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_rate_display() {
        assert_eq!(HashRate(2.0).to_string(), "2.00 H/s");
        assert_eq!(HashRate(1_500.0).to_string(), "1.50K H/s");
        assert_eq!(HashRate(2_000_000.0).to_string(), "2.00M H/s");
        assert_eq!(HashRate(3_000_000_000.0).to_string(), "3.00G H/s");
    }

    #[test]
    fn test_progress_hash_rate() {
        let progress = MiningProgress {
            attempts: 1000,
            current_nonce: Nonce::new(1000),
            elapsed: Duration::from_secs(10),
        };
        assert_eq!(progress.hash_rate().value(), 100.0);

        let instant = MiningProgress {
            attempts: 1000,
            current_nonce: Nonce::new(1000),
            elapsed: Duration::ZERO,
        };
        assert_eq!(instant.hash_rate().value(), 0.0);
    }

    #[test]
    fn test_null_observer_is_silent() {
        let mut observer = NullObserver;
        observer.on_progress(&MiningProgress {
            attempts: 1,
            current_nonce: Nonce::new(1),
            elapsed: Duration::ZERO,
        });
    }
}
