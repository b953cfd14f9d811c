//! Miller-Rabin test vectors.
//!
//! Reads lists of known primes and composites, classifies each with
//! Miller-Rabin, and emits `{ n, d, s }` records where `n - 1 = d * 2^s`.
//! Consumers use the records to exercise primality verifiers that take the
//! decomposition as a hint.
//!
//! Input lists are JSON arrays whose entries are either numbers or decimal
//! strings. Output `n` and `d` are always decimal strings.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Environment, PrimeError, PrimeGenerator,
    generate::MIN_PRIME_BITS,
    primality::{MillerRabin, is_probable_prime},
};

/// Errors from loading, classifying, or writing test vectors.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Randomness or generation failed.
    #[error(transparent)]
    Prime(#[from] PrimeError),

    /// A vector file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON input was malformed, or output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A list entry is not a non-negative decimal integer.
    #[error("invalid number in input: {value:?}")]
    InvalidNumber {
        /// The offending entry.
        value: String,
    },

    /// Miller-Rabin disagreed with the list the number came from.
    #[error("{n} in {category} classified as {}", misclassified_as(.expected_prime))]
    Mismatch {
        /// List the number came from.
        category: Category,
        /// The misclassified number.
        n: BigUint,
        /// Whether the list expects primes.
        expected_prime: bool,
    },

    /// The number is below 2, so `n - 1` has no decomposition.
    #[error("{n} in {category} is below 2")]
    Undecomposable {
        /// List the number came from.
        category: Category,
        /// The offending number.
        n: BigUint,
    },
}

fn misclassified_as(expected_prime: &bool) -> &'static str {
    if *expected_prime { "composite" } else { "prime" }
}

/// One of the four vector lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Primes that fit a machine word.
    SmallPrimes,
    /// Multi-word primes.
    LargePrimes,
    /// Composites that fit a machine word.
    SmallComposites,
    /// Multi-word composites.
    LargeComposites,
}

impl Category {
    /// Every category, in output order.
    pub const ALL: [Self; 4] =
        [Self::SmallPrimes, Self::LargePrimes, Self::SmallComposites, Self::LargeComposites];

    /// Whether numbers in this list must classify as prime.
    pub fn expects_prime(self) -> bool {
        matches!(self, Self::SmallPrimes | Self::LargePrimes)
    }

    /// Input file name inside a vector directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::SmallPrimes => "first-primes.json",
            Self::LargePrimes => "large-primes.json",
            Self::SmallComposites => "first-composites.json",
            Self::LargeComposites => "large-composites.json",
        }
    }

    /// Key used in the output object.
    pub fn key(self) -> &'static str {
        match self {
            Self::SmallPrimes => "smallPrimes",
            Self::LargePrimes => "largePrimes",
            Self::SmallComposites => "smallComposites",
            Self::LargeComposites => "largeComposites",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLiteral {
    Int(u64),
    Text(String),
}

impl NumberLiteral {
    fn into_biguint(self) -> Result<BigUint, VectorError> {
        match self {
            Self::Int(n) => Ok(BigUint::from(n)),
            Self::Text(s) => BigUint::parse_bytes(s.trim().as_bytes(), 10)
                .ok_or(VectorError::InvalidNumber { value: s }),
        }
    }
}

/// Parse a JSON array of numbers or decimal strings.
pub fn parse_list(json: &str) -> Result<Vec<BigUint>, VectorError> {
    let literals: Vec<NumberLiteral> = serde_json::from_str(json)?;
    literals.into_iter().map(NumberLiteral::into_biguint).collect()
}

/// The four input lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorInputs {
    /// Known small primes.
    pub small_primes: Vec<BigUint>,
    /// Known large primes.
    pub large_primes: Vec<BigUint>,
    /// Known small composites.
    pub small_composites: Vec<BigUint>,
    /// Known large composites.
    pub large_composites: Vec<BigUint>,
}

impl VectorInputs {
    /// Load the four lists from `dir`, one file per [`Category::file_name`].
    pub fn load_dir(dir: &Path) -> Result<Self, VectorError> {
        let mut inputs = Self::default();
        for category in Category::ALL {
            let path = dir.join(category.file_name());
            let json = fs::read_to_string(&path)
                .map_err(|source| VectorError::Io { path: path.clone(), source })?;
            *inputs.list_mut(category) = parse_list(&json)?;
            tracing::debug!("loaded {} entries from {}", inputs.list(category).len(), path.display());
        }
        Ok(inputs)
    }

    /// Build inputs without files.
    ///
    /// Small lists hold the first `count` primes and composites above 1.
    /// Large lists hold `count` generated primes of `bits` bits and `count`
    /// products of two generated primes of `bits / 2` bits.
    pub fn synthesize<E: Environment>(
        generator: &PrimeGenerator<E>,
        count: usize,
        bits: u64,
    ) -> Result<Self, VectorError> {
        let rounds = generator.config().rounds;
        let mut inputs = Self::default();

        let mut n = BigUint::from(2u8);
        while inputs.small_primes.len() < count || inputs.small_composites.len() < count {
            if is_probable_prime(generator.env(), &n, rounds)? {
                if inputs.small_primes.len() < count {
                    inputs.small_primes.push(n.clone());
                }
            } else if inputs.small_composites.len() < count {
                inputs.small_composites.push(n.clone());
            }
            n += 1u8;
        }

        let half = (bits / 2).max(MIN_PRIME_BITS);
        for _ in 0..count {
            inputs.large_primes.push(generator.generate_probable_prime(bits)?);

            let p = generator.generate_probable_prime(half)?;
            let q = generator.generate_probable_prime(half)?;
            inputs.large_composites.push(p * q);
        }

        Ok(inputs)
    }

    /// The list for `category`.
    pub fn list(&self, category: Category) -> &[BigUint] {
        match category {
            Category::SmallPrimes => &self.small_primes,
            Category::LargePrimes => &self.large_primes,
            Category::SmallComposites => &self.small_composites,
            Category::LargeComposites => &self.large_composites,
        }
    }

    fn list_mut(&mut self, category: Category) -> &mut Vec<BigUint> {
        match category {
            Category::SmallPrimes => &mut self.small_primes,
            Category::LargePrimes => &mut self.large_primes,
            Category::SmallComposites => &mut self.small_composites,
            Category::LargeComposites => &mut self.large_composites,
        }
    }
}

/// A classified number and the decomposition of `n - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// The number under test.
    #[serde(with = "decimal")]
    pub n: BigUint,
    /// Odd part of `n - 1`.
    #[serde(with = "decimal")]
    pub d: BigUint,
    /// Power of two dividing `n - 1`.
    pub s: u64,
}

/// Classified records for every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVectors {
    /// Records for [`Category::SmallPrimes`].
    pub small_primes: Vec<VectorRecord>,
    /// Records for [`Category::LargePrimes`].
    pub large_primes: Vec<VectorRecord>,
    /// Records for [`Category::SmallComposites`].
    pub small_composites: Vec<VectorRecord>,
    /// Records for [`Category::LargeComposites`].
    pub large_composites: Vec<VectorRecord>,
}

impl TestVectors {
    /// Classify every input and record its decomposition.
    ///
    /// Fails on the first number whose classification disagrees with its
    /// list.
    pub fn build<E: Environment>(
        env: &E,
        inputs: &VectorInputs,
        rounds: u32,
    ) -> Result<Self, VectorError> {
        let tester = MillerRabin::new(rounds);
        let mut vectors = Self::default();

        for category in Category::ALL {
            let records = vectors.records_mut(category);
            for n in inputs.list(category) {
                let verdict = tester.check(env, n)?;
                let Some(decomposition) = verdict.decomposition else {
                    return Err(VectorError::Undecomposable { category, n: n.clone() });
                };
                if verdict.probable_prime != category.expects_prime() {
                    return Err(VectorError::Mismatch {
                        category,
                        n: n.clone(),
                        expected_prime: category.expects_prime(),
                    });
                }
                records.push(VectorRecord {
                    n: n.clone(),
                    d: decomposition.d,
                    s: decomposition.s,
                });
            }
            tracing::info!("classified {} entries in {}", records.len(), category);
        }

        Ok(vectors)
    }

    /// Records for `category`.
    pub fn records(&self, category: Category) -> &[VectorRecord] {
        match category {
            Category::SmallPrimes => &self.small_primes,
            Category::LargePrimes => &self.large_primes,
            Category::SmallComposites => &self.small_composites,
            Category::LargeComposites => &self.large_composites,
        }
    }

    fn records_mut(&mut self, category: Category) -> &mut Vec<VectorRecord> {
        match category {
            Category::SmallPrimes => &mut self.small_primes,
            Category::LargePrimes => &mut self.large_primes,
            Category::SmallComposites => &mut self.small_composites,
            Category::LargeComposites => &mut self.large_composites,
        }
    }

    /// Compact JSON encoding.
    pub fn to_json(&self) -> Result<String, VectorError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the JSON encoding to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), VectorError> {
        fs::write(path, self.to_json()?)
            .map_err(|source| VectorError::Io { path: path.to_path_buf(), source })
    }
}

mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(n: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(n)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal integer: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneratorConfig, SeededEnv};

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn inputs() -> VectorInputs {
        VectorInputs {
            small_primes: vec![big(2), big(3), big(5), big(7919)],
            large_primes: vec![(BigUint::from(1u8) << 127u32) - 1u8],
            small_composites: vec![big(4), big(9), big(561)],
            large_composites: vec![big(2_147_483_647) * big(2_305_843_009_213_693_951)],
        }
    }

    #[test]
    fn parse_list_accepts_numbers_and_strings() {
        let list = parse_list(r#"[2, "3", " 170141183460469231731687303715884105727 "]"#).unwrap();
        assert_eq!(list[0], big(2));
        assert_eq!(list[1], big(3));
        assert_eq!(list[2], (BigUint::from(1u8) << 127u32) - 1u8);
    }

    #[test]
    fn parse_list_rejects_garbage() {
        let err = parse_list(r#"["12a"]"#).unwrap_err();
        assert!(matches!(err, VectorError::InvalidNumber { value } if value == "12a"));

        assert!(matches!(parse_list("{}"), Err(VectorError::Json(_))));
        assert!(matches!(parse_list("[-1]"), Err(VectorError::Json(_))));
    }

    #[test]
    fn build_records_decompositions() {
        let env = SeededEnv::with_seed(1);
        let vectors = TestVectors::build(&env, &inputs(), 20).unwrap();

        assert_eq!(vectors.small_primes.len(), 4);
        assert_eq!(vectors.small_primes[0], VectorRecord { n: big(2), d: big(1), s: 0 });
        assert_eq!(vectors.small_composites[2], VectorRecord { n: big(561), d: big(35), s: 4 });
        assert_eq!(vectors.records(Category::LargePrimes)[0].s, 1);
        assert_eq!(vectors.large_composites.len(), 1);
    }

    #[test]
    fn build_rejects_misfiled_number() {
        let env = SeededEnv::with_seed(2);
        let mut inputs = inputs();
        inputs.small_primes.push(big(91));

        let err = TestVectors::build(&env, &inputs, 20).unwrap_err();
        assert!(matches!(
            err,
            VectorError::Mismatch { category: Category::SmallPrimes, expected_prime: true, .. }
        ));
        assert_eq!(err.to_string(), "91 in smallPrimes classified as composite");
    }

    #[test]
    fn build_rejects_values_below_two() {
        let env = SeededEnv::with_seed(3);
        let inputs = VectorInputs { small_composites: vec![big(1)], ..VectorInputs::default() };

        let err = TestVectors::build(&env, &inputs, 20).unwrap_err();
        assert!(matches!(err, VectorError::Undecomposable { category: Category::SmallComposites, .. }));
    }

    #[test]
    fn json_shape_uses_camel_case_and_strings() {
        let vectors = TestVectors {
            small_primes: vec![VectorRecord { n: big(13), d: big(3), s: 2 }],
            ..TestVectors::default()
        };

        assert_eq!(
            vectors.to_json().unwrap(),
            r#"{"smallPrimes":[{"n":"13","d":"3","s":2}],"largePrimes":[],"smallComposites":[],"largeComposites":[]}"#
        );

        let decoded: TestVectors = serde_json::from_str(&vectors.to_json().unwrap()).unwrap();
        assert_eq!(decoded, vectors);
    }

    #[test]
    fn load_dir_reads_all_four_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("first-primes.json"), "[2, 3, 5]").unwrap();
        fs::write(dir.path().join("large-primes.json"), r#"["2305843009213693951"]"#).unwrap();
        fs::write(dir.path().join("first-composites.json"), "[4, 6]").unwrap();
        fs::write(dir.path().join("large-composites.json"), r#"["4611686014132420609"]"#).unwrap();

        let inputs = VectorInputs::load_dir(dir.path()).unwrap();
        assert_eq!(inputs.small_primes.len(), 3);
        assert_eq!(inputs.large_primes, vec![big(2_305_843_009_213_693_951)]);
        assert_eq!(inputs.small_composites, vec![big(4), big(6)]);
        assert_eq!(inputs.large_composites, vec![big(4_611_686_014_132_420_609)]);
    }

    #[test]
    fn load_dir_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorInputs::load_dir(dir.path()).unwrap_err();
        assert!(
            matches!(&err, VectorError::Io { path, .. } if path.ends_with("first-primes.json"))
        );
    }

    #[test]
    fn synthesized_inputs_classify_cleanly() {
        let generator = PrimeGenerator::new(
            SeededEnv::with_seed(4),
            GeneratorConfig { rounds: 20, ..GeneratorConfig::default() },
        );
        let inputs = VectorInputs::synthesize(&generator, 5, 96).unwrap();

        assert_eq!(inputs.small_primes, vec![big(2), big(3), big(5), big(7), big(11)]);
        assert_eq!(inputs.small_composites, vec![big(4), big(6), big(8), big(9), big(10)]);
        assert_eq!(inputs.large_primes.len(), 5);
        assert!(inputs.large_primes.iter().all(|p| p.bits() == 96));
        assert_eq!(inputs.large_composites.len(), 5);

        let vectors = TestVectors::build(generator.env(), &inputs, 20).unwrap();
        assert_eq!(vectors.large_composites.len(), 5);
    }
}
