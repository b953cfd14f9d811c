//! Miller-Rabin probabilistic primality testing.
//!
//! Candidates are first checked against the primes below [`TRIAL_DIVISION_LIMIT`]
//! and only survivors pay for modular exponentiation.
//!
//! # Invariants
//!
//! - No false negatives: a prime is never reported composite
//! - For odd composite `n`, each round errs with probability at most 1/4
//! - The decomposition always satisfies `n - 1 = d * 2^s` with `d` odd

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::{Environment, PrimeError, bits::random_below};

/// Default number of Miller-Rabin rounds.
pub const DEFAULT_ROUNDS: u32 = 40;

/// Exclusive upper bound of the trial division table.
pub const TRIAL_DIVISION_LIMIT: u32 = 1000;

/// `n - 1 = d * 2^s` with `d` odd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Odd part of `n - 1`.
    pub d: BigUint,
    /// Power of two dividing `n - 1`.
    pub s: u64,
}

/// Decompose `n - 1` into its odd part and power of two.
///
/// Returns `None` for `n < 2`, where `n - 1` has no odd part.
pub fn decompose(n: &BigUint) -> Option<Decomposition> {
    if n < &BigUint::from(2u8) {
        return None;
    }

    let n_minus_1 = n - 1u8;
    let s = n_minus_1.trailing_zeros()?;
    Some(Decomposition { d: n_minus_1 >> s, s })
}

/// Outcome of a primality check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// True if `n` passed every round.
    pub probable_prime: bool,
    /// Decomposition of `n - 1`, absent for `n < 2`.
    pub decomposition: Option<Decomposition>,
}

/// Miller-Rabin tester with a fixed round count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerRabin {
    rounds: u32,
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self { rounds: DEFAULT_ROUNDS }
    }
}

impl MillerRabin {
    /// Create a tester running `rounds` random-witness rounds.
    #[must_use]
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }

    /// Classify `n`, drawing witnesses from `env`.
    ///
    /// A tester with zero rounds is rejected rather than passing every
    /// candidate that survives trial division.
    pub fn check<E: Environment>(&self, env: &E, n: &BigUint) -> Result<Verdict, PrimeError> {
        if self.rounds == 0 {
            return Err(PrimeError::ZeroRounds);
        }

        let Some(decomposition) = decompose(n) else {
            return Ok(Verdict { probable_prime: false, decomposition: None });
        };

        let probable_prime = match n.to_u32() {
            Some(small) if small < TRIAL_DIVISION_LIMIT => small_primes().binary_search(&small).is_ok(),
            _ => !has_small_factor(n) && self.passes_rounds(env, n, &decomposition)?,
        };

        Ok(Verdict { probable_prime, decomposition: Some(decomposition) })
    }

    /// Run the witness rounds. Requires odd `n` above the trial division limit.
    fn passes_rounds<E: Environment>(
        &self,
        env: &E,
        n: &BigUint,
        decomposition: &Decomposition,
    ) -> Result<bool, PrimeError> {
        let one = BigUint::one();
        let n_minus_1 = n - 1u8;
        // Witnesses come from [2, n - 2].
        let witness_span = n - 3u8;

        'witness: for _ in 0..self.rounds {
            let a = random_below(env, &witness_span)? + 2u8;
            let mut x = a.modpow(&decomposition.d, n);

            if x == one || x == n_minus_1 {
                continue;
            }

            for _ in 1..decomposition.s {
                x = &x * &x % n;
                if x == n_minus_1 {
                    continue 'witness;
                }
                if x == one {
                    return Ok(false);
                }
            }

            return Ok(false);
        }

        Ok(true)
    }
}

/// Convenience wrapper around [`MillerRabin::check`].
pub fn is_probable_prime<E: Environment>(
    env: &E,
    n: &BigUint,
    rounds: u32,
) -> Result<bool, PrimeError> {
    Ok(MillerRabin::new(rounds).check(env, n)?.probable_prime)
}

/// True if some prime below [`TRIAL_DIVISION_LIMIT`] properly divides `n`.
pub fn has_small_factor(n: &BigUint) -> bool {
    small_primes().iter().any(|&p| {
        let p_big = BigUint::from(p);
        n != &p_big && (n % p).is_zero()
    })
}

/// Primes below [`TRIAL_DIVISION_LIMIT`], ascending.
pub fn small_primes() -> &'static [u32] {
    static PRIMES: OnceLock<Vec<u32>> = OnceLock::new();
    PRIMES.get_or_init(|| sieve(TRIAL_DIVISION_LIMIT))
}

fn sieve(limit: u32) -> Vec<u32> {
    let limit = limit as usize;
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();

    for i in 2..limit {
        if composite[i] {
            continue;
        }
        primes.push(i);
        for multiple in (i * i..limit).step_by(i) {
            composite[multiple] = true;
        }
    }

    primes.into_iter().filter_map(|p| u32::try_from(p).ok()).collect()
}
