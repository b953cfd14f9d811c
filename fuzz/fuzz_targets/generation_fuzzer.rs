//! Fuzz target for [`PrimeGenerator`] and [`Sample`]
//!
//! # Invariants
//!
//! - Bit sizes below 2 MUST be rejected, never looped on
//! - Every drawn value has exactly the requested bit length
//! - A drawn sample always passes its own verification

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use primegen_core::{GeneratorConfig, PrimeError, PrimeGenerator, Sample, SeededEnv, bit_length};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    seed: u64,
    bits: u8,
}

fuzz_target!(|input: FuzzInput| {
    let bits = u64::from(input.bits);
    let generator = PrimeGenerator::new(
        SeededEnv::with_seed(input.seed),
        GeneratorConfig { bit_size: bits, rounds: 8, max_attempts: None },
    );

    match Sample::draw(&generator) {
        Ok(sample) => {
            assert!(bits >= 2);
            assert_eq!(bit_length(&sample.random), bits);
            assert_eq!(bit_length(&sample.p), bits);
            assert_eq!(bit_length(&sample.q), bits);
            assert!(sample.verify(generator.env(), 8).is_ok());
        },
        Err(PrimeError::InvalidBitSize { bits: rejected, .. }) => {
            assert!(rejected < 2);
        },
        Err(e) => panic!("unexpected error: {e}"),
    }
});
