//! Sizing and sampling helpers for arbitrary-precision integers.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::{Environment, PrimeError};

/// Number of significant bits in `n`. Zero has length 0.
pub fn bit_length(n: &BigUint) -> u64 {
    n.bits()
}

/// Number of digits in the base-10 rendering of `n`. Zero has one digit.
pub fn decimal_digits(n: &BigUint) -> usize {
    n.to_str_radix(10).len()
}

/// Uniform sample from `[0, 2^bits)`.
pub fn random_bits<E: Environment>(env: &E, bits: u64) -> Result<BigUint, PrimeError> {
    if bits == 0 {
        return Ok(BigUint::zero());
    }

    let len = usize::try_from(bits.div_ceil(8))
        .map_err(|_| PrimeError::InvalidBitSize { bits, min: 1 })?;
    let mut buf = vec![0u8; len];
    env.random_bytes(&mut buf)?;

    // Big-endian: the excess high bits live in the first byte.
    let excess = bits.div_ceil(8) * 8 - bits;
    buf[0] &= 0xffu8 >> excess;

    Ok(BigUint::from_bytes_be(&buf))
}

/// Uniform sample from `[2^(bits-1), 2^bits)`.
///
/// The top bit is always set, so the result has bit length exactly `bits`.
pub fn random_integer<E: Environment>(env: &E, bits: u64) -> Result<BigUint, PrimeError> {
    if bits == 0 {
        return Err(PrimeError::InvalidBitSize { bits, min: 1 });
    }

    let mut n = random_bits(env, bits)?;
    n.set_bit(bits - 1, true);
    Ok(n)
}

/// Uniform sample from `[0, bound)` by rejection.
pub fn random_below<E: Environment>(env: &E, bound: &BigUint) -> Result<BigUint, PrimeError> {
    if bound.is_zero() {
        return Err(PrimeError::EmptyRange);
    }

    let bits = bound.bits();
    loop {
        let candidate = random_bits(env, bits)?;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::SeededEnv;

    #[test]
    fn bit_length_of_small_values() {
        assert_eq!(bit_length(&BigUint::zero()), 0);
        assert_eq!(bit_length(&BigUint::from(1u8)), 1);
        assert_eq!(bit_length(&BigUint::from(255u8)), 8);
        assert_eq!(bit_length(&BigUint::from(256u16)), 9);
    }

    #[test]
    fn decimal_digits_of_small_values() {
        assert_eq!(decimal_digits(&BigUint::zero()), 1);
        assert_eq!(decimal_digits(&BigUint::from(9u8)), 1);
        assert_eq!(decimal_digits(&BigUint::from(10u8)), 2);
        assert_eq!(decimal_digits(&BigUint::from(u64::MAX)), 20);
    }

    #[test]
    fn random_integer_rejects_zero_bits() {
        let env = SeededEnv::with_seed(0);
        assert_eq!(
            random_integer(&env, 0),
            Err(PrimeError::InvalidBitSize { bits: 0, min: 1 })
        );
    }

    #[test]
    fn random_integer_one_bit_is_one() {
        let env = SeededEnv::with_seed(0);
        assert_eq!(random_integer(&env, 1).unwrap(), BigUint::from(1u8));
    }

    #[test]
    fn random_below_rejects_zero_bound() {
        let env = SeededEnv::with_seed(0);
        assert_eq!(random_below(&env, &BigUint::zero()), Err(PrimeError::EmptyRange));
    }

    #[test]
    fn random_below_one_is_zero() {
        let env = SeededEnv::with_seed(3);
        for _ in 0..16 {
            assert!(random_below(&env, &BigUint::from(1u8)).unwrap().is_zero());
        }
    }

    #[test]
    fn random_bits_covers_small_range() {
        let env = SeededEnv::with_seed(11);
        let mut seen = [false; 8];
        for _ in 0..256 {
            let v = random_bits(&env, 3).unwrap();
            let idx = usize::try_from(v.to_u64_digits().first().copied().unwrap_or(0)).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "every 3-bit value should appear: {seen:?}");
    }

    proptest! {
        #[test]
        fn random_integer_has_exact_bit_length(bits in 1u64..600, seed in any::<u64>()) {
            let env = SeededEnv::with_seed(seed);
            let n = random_integer(&env, bits).unwrap();
            prop_assert_eq!(bit_length(&n), bits);
        }

        #[test]
        fn random_bits_stays_in_range(bits in 0u64..300, seed in any::<u64>()) {
            let env = SeededEnv::with_seed(seed);
            let n = random_bits(&env, bits).unwrap();
            prop_assert!(bit_length(&n) <= bits);
        }

        #[test]
        fn random_below_stays_below(bound in 1u64.., seed in any::<u64>()) {
            let env = SeededEnv::with_seed(seed);
            let bound = BigUint::from(bound);
            let n = random_below(&env, &bound).unwrap();
            prop_assert!(n < bound);
        }
    }
}
