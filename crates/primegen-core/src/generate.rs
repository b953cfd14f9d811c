//! Random probable prime generation.

use num_bigint::BigUint;

use crate::{
    Environment, PrimeError, bits,
    primality::{DEFAULT_ROUNDS, MillerRabin},
};

/// Default bit size for generated values.
pub const DEFAULT_BIT_SIZE: u64 = 4096;

/// Smallest bit size that holds a prime.
pub const MIN_PRIME_BITS: u64 = 2;

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Bit size of every generated value.
    pub bit_size: u64,
    /// Miller-Rabin rounds per candidate.
    pub rounds: u32,
    /// Candidate cap per prime. `None` searches until a prime is found.
    pub max_attempts: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { bit_size: DEFAULT_BIT_SIZE, rounds: DEFAULT_ROUNDS, max_attempts: None }
    }
}

/// Draws random integers and probable primes from an [`Environment`].
#[derive(Debug, Clone)]
pub struct PrimeGenerator<E: Environment> {
    env: E,
    config: GeneratorConfig,
    tester: MillerRabin,
}

impl<E: Environment> PrimeGenerator<E> {
    /// Create a generator over `env` with the given settings.
    pub fn new(env: E, config: GeneratorConfig) -> Self {
        let tester = MillerRabin::new(config.rounds);
        Self { env, config, tester }
    }

    /// The generator's settings.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The environment randomness is drawn from.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Random integer of exactly `bits` bits.
    pub fn random_integer(&self, bits: u64) -> Result<BigUint, PrimeError> {
        bits::random_integer(&self.env, bits)
    }

    /// Probable prime of exactly `bits` bits.
    ///
    /// Candidates have their top and bottom bits forced on, then go through
    /// trial division and Miller-Rabin.
    pub fn generate_probable_prime(&self, bits: u64) -> Result<BigUint, PrimeError> {
        if bits < MIN_PRIME_BITS {
            return Err(PrimeError::InvalidBitSize { bits, min: MIN_PRIME_BITS });
        }

        let mut attempts: u64 = 0;
        loop {
            if let Some(max) = self.config.max_attempts
                && attempts >= max
            {
                tracing::warn!("gave up on {}-bit prime after {} candidates", bits, attempts);
                return Err(PrimeError::AttemptsExhausted { bits, attempts });
            }
            attempts += 1;

            let mut candidate = bits::random_integer(&self.env, bits)?;
            candidate.set_bit(0, true);

            if self.tester.check(&self.env, &candidate)?.probable_prime {
                tracing::debug!("found {}-bit probable prime after {} candidates", bits, attempts);
                return Ok(candidate);
            }
        }
    }

    /// Probable prime at the configured bit size.
    pub fn prime(&self) -> Result<BigUint, PrimeError> {
        self.generate_probable_prime(self.config.bit_size)
    }
}
