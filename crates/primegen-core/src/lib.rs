//! Large probable prime generation.
//!
//! This crate draws random integers and Miller-Rabin probable primes of a
//! fixed bit size, multiplies prime pairs, and renders the results. It also
//! produces primality test vectors (`n`, `d`, `s` with `n - 1 = d * 2^s`)
//! from lists of known primes and composites.
//!
//! ## Architecture
//!
//! ```text
//! primegen-core
//!   ├─ Environment     (entropy: SystemEnv, SeededEnv)
//!   ├─ bits            (bit length, digit count, uniform sampling)
//!   ├─ MillerRabin     (trial division + random-witness rounds)
//!   ├─ PrimeGenerator  (exact-size probable primes)
//!   ├─ Sample          (random, p, q, N and their report lines)
//!   └─ TestVectors     (classified decompositions as JSON)
//! ```
//!
//! # Example
//!
//! ```
//! use primegen_core::{GeneratorConfig, PrimeGenerator, Sample, SeededEnv};
//!
//! let config = GeneratorConfig { bit_size: 64, ..GeneratorConfig::default() };
//! let generator = PrimeGenerator::new(SeededEnv::with_seed(1), config);
//!
//! let sample = Sample::draw(&generator).unwrap();
//! assert_eq!(sample.n, &sample.p * &sample.q);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod env;
mod error;
pub mod generate;
pub mod primality;
pub mod report;
pub mod vectors;

pub use bits::{bit_length, decimal_digits};
pub use env::{Environment, SeededEnv, SystemEnv};
pub use error::PrimeError;
pub use generate::{DEFAULT_BIT_SIZE, GeneratorConfig, PrimeGenerator};
pub use primality::{DEFAULT_ROUNDS, Decomposition, MillerRabin, Verdict, is_probable_prime};
pub use report::{ReportLine, Sample};
pub use vectors::{Category, TestVectors, VectorError, VectorInputs, VectorRecord};
