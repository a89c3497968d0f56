//! Error types for the provider.
//!
//! Every fallible operation of the registry and the contexts reports one of
//! these variants. Weak keys are warnings, not errors.

use crate::memory::MemLockError;
use crate::types::KeyLength;
use thiserror::Error;

/// Main error type for all provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The feature name is not in the provider's table.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The engine refused to open, key or initialize a transform.
    #[error("Engine setup failed ({stage}): {reason}")]
    BackendSetup {
        /// Which setup step failed (`open`, `setkey`, `setiv`).
        stage: &'static str,
        /// Human readable reason from the engine.
        reason: String,
    },

    /// The key does not satisfy the algorithm's key length contract.
    #[error("Invalid key length for {algorithm}: {length} bytes (expected {expected})")]
    InvalidKeyLength {
        /// Algorithm name.
        algorithm: &'static str,
        /// Length that was supplied.
        length: usize,
        /// The algorithm's contract.
        expected: KeyLength,
    },

    /// The IV is not exactly one block long for a mode that needs one.
    #[error("Invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength {
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        actual: usize,
    },

    /// `update` or `finalize` was called before `setup`.
    #[error("Cipher context has not been set up")]
    NotKeyed,

    /// `setup` was called on a context that is still active.
    #[error("Cipher context is already set up")]
    AlreadyKeyed,

    /// The context was finalized and needs a fresh `setup`.
    #[error("Cipher context is finished; call setup again")]
    Finished,

    /// Unpadded finalization with a partial block left over.
    #[error("Input is not a multiple of the block size: {pending} byte(s) pending, block size {block_size}")]
    IncompleteBlock {
        /// Bytes that never formed a full block.
        pending: usize,
        /// Block size of the algorithm.
        block_size: usize,
    },

    /// PKCS#7 padding did not validate on decryption.
    #[error("Invalid padding")]
    InvalidPadding,

    /// Key derivation failed.
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    /// The secure memory pool cannot satisfy a reservation.
    #[error("Secure memory pool exhausted: requested {requested} bytes, {available} available")]
    PoolExhausted {
        /// Bytes requested.
        requested: usize,
        /// Bytes left in the budget.
        available: usize,
    },

    /// Memory locking failed.
    #[error("Memory lock error: {0}")]
    MemLock(#[from] MemLockError),
}

impl ProviderError {
    pub(crate) fn setup(stage: &'static str, reason: impl ToString) -> Self {
        ProviderError::BackendSetup {
            stage,
            reason: reason.to_string(),
        }
    }
}

impl From<cipher::InvalidLength> for ProviderError {
    fn from(err: cipher::InvalidLength) -> Self {
        ProviderError::setup("setkey", err)
    }
}

/// Type alias for Results using ProviderError.
pub type Result<T> = std::result::Result<T, ProviderError>;
