//! Error types.

use thiserror::Error;

/// Errors from randomness, generation, and verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimeError {
    /// Requested bit size is below the minimum for the operation.
    #[error("invalid bit size {bits}: must be at least {min}")]
    InvalidBitSize {
        /// Requested bit size.
        bits: u64,
        /// Smallest accepted bit size.
        min: u64,
    },

    /// Miller-Rabin needs at least one witness round.
    #[error("Miller-Rabin round count must be at least 1")]
    ZeroRounds,

    /// Sampling bound was zero, so no value can be drawn below it.
    #[error("cannot sample below an empty bound")]
    EmptyRange,

    /// The entropy source failed to produce bytes.
    #[error("entropy source failed: {reason}")]
    Entropy {
        /// Description of the underlying failure.
        reason: String,
    },

    /// The configured candidate cap was reached without finding a prime.
    #[error("no probable prime of {bits} bits after {attempts} candidates")]
    AttemptsExhausted {
        /// Requested bit size.
        bits: u64,
        /// Number of candidates examined.
        attempts: u64,
    },

    /// A drawn sample violated one of its guaranteed properties.
    #[error("sample verification failed: {reason}")]
    Verification {
        /// Which property failed.
        reason: String,
    },
}
