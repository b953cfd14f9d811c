//! Fuzz target for [`MillerRabin`] and [`decompose`]
//!
//! # Strategy
//!
//! - Arbitrary big-endian byte strings as candidates, including zero, one and
//!   leading-zero encodings
//! - Arbitrary seeds and round counts for the witness stream
//!
//! # Invariants
//!
//! - NEVER panic on any candidate
//! - `n < 2` has no decomposition and is never prime
//! - Decomposition reconstructs `n` with an odd `d`
//! - Below 2^32 the verdict matches trial division exactly

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use primegen_core::{Decomposition, MillerRabin, SeededEnv, primality::decompose};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    seed: u64,
    rounds: u8,
    candidate: Vec<u8>,
}

fn naive_is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|i| i * i <= n).all(|i| n % i != 0)
}

fuzz_target!(|input: FuzzInput| {
    // Keep modpow cost bounded
    if input.candidate.len() > 256 {
        return;
    }

    let n = BigUint::from_bytes_be(&input.candidate);
    let env = SeededEnv::with_seed(input.seed);
    // At least one round so small-witness behavior is exercised.
    let tester = MillerRabin::new(u32::from(input.rounds % 16) + 1);

    let Ok(verdict) = tester.check(&env, &n) else {
        panic!("seeded environment never fails");
    };

    match decompose(&n) {
        None => {
            assert!(n < BigUint::from(2u8));
            assert!(!verdict.probable_prime);
            assert_eq!(verdict.decomposition, None);
        },
        Some(Decomposition { d, s }) => {
            assert!(d.bit(0), "d must be odd");
            assert_eq!((&d << s) + 1u8, n);
            assert_eq!(verdict.decomposition, Some(Decomposition { d, s }));
        },
    }

    if let Ok(small) = u32::try_from(&n) {
        assert_eq!(verdict.probable_prime, naive_is_prime(u64::from(small)), "n = {small}");
    }
});
