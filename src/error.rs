//! Error handling for powchain.
//!
//! Typed errors covering mining, block admission and the configuration
//! layer. Validation of a claimed proof is deliberately not an error path;
//! it is a pure boolean predicate on well-formed inputs.

use thiserror::Error;

/// Result type alias for powchain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for powchain.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Difficulty outside the representable target range
    #[error("Invalid difficulty {difficulty}: must be at most {max}")]
    InvalidDifficulty { difficulty: u32, max: u32 },

    /// Mining ran out of nonces without finding a satisfying digest
    #[error("Nonce space exhausted after {attempts} attempts at difficulty {difficulty}")]
    SearchExhausted { attempts: u64, difficulty: u32 },

    /// Block rejected at chain admission
    #[error("Invalid block: {message}")]
    InvalidBlock { message: String },

    /// Block hash parsing errors
    #[error("Invalid hash: {message}")]
    Hash { message: String },

    /// Worker errors
    #[error("Worker error: {message}")]
    Worker { message: String },

    /// Cancellation errors for async operations
    #[error("Operation was cancelled: {operation}")]
    Cancelled { operation: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid difficulty error
    pub fn invalid_difficulty(difficulty: u32, max: u32) -> Self {
        Self::InvalidDifficulty { difficulty, max }
    }

    /// Create a search exhaustion error
    pub fn search_exhausted(attempts: u64, difficulty: u32) -> Self {
        Self::SearchExhausted {
            attempts,
            difficulty,
        }
    }

    /// Create an invalid block error
    pub fn invalid_block(message: impl Into<String>) -> Self {
        Self::InvalidBlock {
            message: message.into(),
        }
    }

    /// Create a hash error
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    /// Create a worker error
    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Json(_) => "json",
            Error::Yaml(_) => "yaml",
            Error::Io(_) => "io",
            Error::Config { .. } => "config",
            Error::InvalidDifficulty { .. } => "invalid_difficulty",
            Error::SearchExhausted { .. } => "search_exhausted",
            Error::InvalidBlock { .. } => "invalid_block",
            Error::Hash { .. } => "hash",
            Error::Worker { .. } => "worker",
            Error::Cancelled { .. } => "cancelled",
        }
    }
}
