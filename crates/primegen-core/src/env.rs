//! Environment abstraction for randomness.
//!
//! Generation logic never touches a global RNG. Every random byte comes from
//! an [`Environment`], so the same code runs against OS entropy in production
//! and against a seeded stream in tests.
//!
//! # Invariants
//!
//! - Determinism: given the same seed, [`SeededEnv`] produces the same byte
//!   sequence
//! - Sharing: clones of an environment draw from one stream, never a copy of
//!   it

use std::sync::{Arc, Mutex, PoisonError};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::PrimeError;

/// Source of random bytes.
///
/// # Security
///
/// Production implementations MUST use OS entropy (`getrandom`). Seeded
/// implementations are for reproducible runs and tests only.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), PrimeError>;

    /// Generates a random `u64`.
    fn random_u64(&self) -> Result<u64, PrimeError> {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes)?;
        Ok(u64::from_be_bytes(bytes))
    }
}

/// Production environment backed by OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), PrimeError> {
        getrandom::fill(buffer).map_err(|e| {
            tracing::error!("getrandom failed: {}", e);
            PrimeError::Entropy { reason: e.to_string() }
        })
    }
}

/// Deterministic environment driven by a seeded ChaCha20 stream.
#[derive(Debug, Clone)]
pub struct SeededEnv {
    rng: Arc<Mutex<ChaCha20Rng>>,
}

impl SeededEnv {
    /// Create an environment whose byte stream is fixed by `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))) }
    }
}

impl Environment for SeededEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), PrimeError> {
        // A panic mid-fill leaves the stream usable, only its position moved.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.fill_bytes(buffer);
        Ok(())
    }
}
