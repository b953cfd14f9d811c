//! A drawn sample of random integer, prime pair and product, and its
//! console rendering.
//!
//! # Format
//!
//! ```text
//! Random: <r>. Length: <bits> bits
//! Prime (p): <p>. Length: <bits> bits, Digits: <digits>
//! Prime (q): <q>. Length: <bits> bits, Digits: <digits>
//! Prime (N): <N>. Length: <bits> bits, Digits: <digits>
//! ```

use std::fmt;

use num_bigint::BigUint;

use crate::{
    Environment, PrimeError, PrimeGenerator,
    bits::{bit_length, decimal_digits},
    primality::MillerRabin,
};

/// One rendered line of a [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLine<'a> {
    /// Text before the colon.
    pub label: &'static str,
    /// The value being reported.
    pub value: &'a BigUint,
    /// Whether to append the decimal digit count.
    pub show_digits: bool,
}

impl fmt::Display for ReportLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}. Length: {} bits", self.label, self.value, bit_length(self.value))?;
        if self.show_digits {
            write!(f, ", Digits: {}", decimal_digits(self.value))?;
        }
        Ok(())
    }
}

/// Random integer, two probable primes and their product at one bit size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Bit size every drawn value was requested at.
    pub bit_size: u64,
    /// Random integer.
    pub random: BigUint,
    /// First prime.
    pub p: BigUint,
    /// Second prime.
    pub q: BigUint,
    /// `p * q`.
    pub n: BigUint,
}

impl Sample {
    /// Draw the random integer, then `p`, then `q`, at the generator's bit size.
    pub fn draw<E: Environment>(generator: &PrimeGenerator<E>) -> Result<Self, PrimeError> {
        let bit_size = generator.config().bit_size;

        let random = generator.random_integer(bit_size)?;
        let p = generator.prime()?;
        let q = generator.prime()?;
        let n = &p * &q;

        tracing::info!("drew {}-bit sample, product has {} bits", bit_size, bit_length(&n));

        Ok(Self { bit_size, random, p, q, n })
    }

    /// The four report lines in output order.
    pub fn lines(&self) -> [ReportLine<'_>; 4] {
        [
            ReportLine { label: "Random", value: &self.random, show_digits: false },
            ReportLine { label: "Prime (p)", value: &self.p, show_digits: true },
            ReportLine { label: "Prime (q)", value: &self.q, show_digits: true },
            ReportLine { label: "Prime (N)", value: &self.n, show_digits: true },
        ]
    }

    /// Re-check sizes, primality of `p` and `q`, and the product.
    pub fn verify<E: Environment>(&self, env: &E, rounds: u32) -> Result<(), PrimeError> {
        for (name, value) in [("random", &self.random), ("p", &self.p), ("q", &self.q)] {
            let len = bit_length(value);
            if len != self.bit_size {
                return Err(PrimeError::Verification {
                    reason: format!("{name} has {len} bits, expected {}", self.bit_size),
                });
            }
        }

        let tester = MillerRabin::new(rounds);
        for (name, value) in [("p", &self.p), ("q", &self.q)] {
            if !tester.check(env, value)?.probable_prime {
                return Err(PrimeError::Verification { reason: format!("{name} is composite") });
            }
        }

        if self.n != &self.p * &self.q {
            return Err(PrimeError::Verification { reason: "N is not p * q".to_string() });
        }

        Ok(())
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [random, p, q, n] = self.lines();
        write!(f, "{random}\n{p}\n{q}\n{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneratorConfig, SeededEnv};

    fn sample(seed: u64, bit_size: u64) -> Sample {
        let generator = PrimeGenerator::new(
            SeededEnv::with_seed(seed),
            GeneratorConfig { bit_size, ..GeneratorConfig::default() },
        );
        Sample::draw(&generator).unwrap()
    }

    #[test]
    fn line_without_digits() {
        let value = BigUint::from(12u8);
        let line = ReportLine { label: "Random", value: &value, show_digits: false };
        assert_eq!(line.to_string(), "Random: 12. Length: 4 bits");
    }

    #[test]
    fn line_with_digits() {
        let value = BigUint::from(143u8);
        let line = ReportLine { label: "Prime (N)", value: &value, show_digits: true };
        assert_eq!(line.to_string(), "Prime (N): 143. Length: 8 bits, Digits: 3");
    }

    #[test]
    fn hand_built_sample_renders_four_lines() {
        let sample = Sample {
            bit_size: 4,
            random: BigUint::from(9u8),
            p: BigUint::from(11u8),
            q: BigUint::from(13u8),
            n: BigUint::from(143u8),
        };

        assert_eq!(
            sample.to_string(),
            "Random: 9. Length: 4 bits\n\
             Prime (p): 11. Length: 4 bits, Digits: 2\n\
             Prime (q): 13. Length: 4 bits, Digits: 2\n\
             Prime (N): 143. Length: 8 bits, Digits: 3"
        );
    }

    #[test]
    fn drawn_sample_verifies() {
        let sample = sample(17, 192);
        assert_eq!(sample.n, &sample.p * &sample.q);
        sample.verify(&SeededEnv::with_seed(0), 40).unwrap();
    }

    #[test]
    fn verify_catches_wrong_product() {
        let mut sample = sample(18, 64);
        sample.n += 2u8;

        let err = sample.verify(&SeededEnv::with_seed(0), 40).unwrap_err();
        assert!(matches!(err, PrimeError::Verification { .. }));
    }

    #[test]
    fn verify_catches_composite() {
        let mut sample = sample(19, 64);
        sample.q = &sample.q + 1u8;
        sample.n = &sample.p * &sample.q;

        let err = sample.verify(&SeededEnv::with_seed(0), 40).unwrap_err();
        assert_eq!(err, PrimeError::Verification { reason: "q is composite".to_string() });
    }

    #[test]
    fn verify_catches_wrong_size() {
        let mut sample = sample(20, 64);
        sample.random >>= 1u8;

        let err = sample.verify(&SeededEnv::with_seed(0), 40).unwrap_err();
        assert_eq!(
            err,
            PrimeError::Verification { reason: "random has 63 bits, expected 64".to_string() }
        );
    }
}
