//! MinHash sketches of column value sets.
//!
//! A sketch keeps, for each of `k` hash permutations, the minimum hash value
//! observed over a set. The fraction of positions where two sketches agree is
//! an unbiased estimate of the Jaccard similarity of the two sets.

use joinscout_common::normalize_value;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::error::{Result, SketchError};

const MERSENNE_PRIME: u64 = (1 << 61) - 1;
const MAX_HASH: u64 = (1 << 32) - 1;

/// Default seed for the permutation parameters.
pub const DEFAULT_SEED: u64 = 1;

/// Hashes a normalized value to 32 bits (first four bytes of SHA-256).
pub fn hash_value(value: &str) -> u32 {
    let digest = Sha256::digest(value.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// The `k` universal hash permutations `(a * h + b) mod p`, derived from a seed.
///
/// Sketches built from the same `Permutations` (same `k` and seed) are
/// comparable with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutations {
    seed: u64,
    a: Vec<u64>,
    b: Vec<u64>,
}

impl Permutations {
    pub fn new(num_perm: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = (0..num_perm)
            .map(|_| rng.gen_range(1..MERSENNE_PRIME))
            .collect();
        let b = (0..num_perm)
            .map(|_| rng.gen_range(0..MERSENNE_PRIME))
            .collect();
        Self { seed, a, b }
    }

    pub fn num_perm(&self) -> usize {
        self.a.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sketches raw cells: missing cells are skipped, the rest normalized.
    pub fn sketch<'a, I>(&self, values: I) -> Sketch
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let normalized = values
            .into_iter()
            .flatten()
            .map(normalize_value)
            .filter(|value| !value.is_empty());
        let mut sketch = Sketch::degenerate(self.num_perm(), self.seed);
        for value in normalized {
            self.update(&mut sketch, &value);
        }
        sketch
    }

    /// Sketches values that already went through [`normalize_value`].
    pub fn sketch_normalized<'a, I>(&self, values: I) -> Sketch
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut sketch = Sketch::degenerate(self.num_perm(), self.seed);
        for value in values {
            self.update(&mut sketch, value);
        }
        sketch
    }

    fn update(&self, sketch: &mut Sketch, value: &str) {
        let hv = u128::from(hash_value(value));
        for ((slot, a), b) in sketch.minima.iter_mut().zip(&self.a).zip(&self.b) {
            let permuted = (u128::from(*a) * hv + u128::from(*b)) % u128::from(MERSENNE_PRIME);
            let hashed = (permuted as u64 & MAX_HASH) as u32;
            if hashed < *slot {
                *slot = hashed;
            }
        }
        sketch.cardinality_hint += 1;
    }
}

/// Fixed-size MinHash signature of a value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketch {
    seed: u64,
    minima: Vec<u32>,
    /// Number of values fed in, duplicates included. Zero marks a
    /// degenerate sketch.
    cardinality_hint: usize,
}

impl Sketch {
    /// Builds a sketch with `num_perm` permutations and the default seed.
    pub fn build<'a, I>(values: I, num_perm: usize) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Permutations::new(num_perm, DEFAULT_SEED).sketch(values)
    }

    fn degenerate(num_perm: usize, seed: u64) -> Self {
        Self {
            seed,
            minima: vec![u32::MAX; num_perm],
            cardinality_hint: 0,
        }
    }

    pub fn num_perm(&self) -> usize {
        self.minima.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn minima(&self) -> &[u32] {
        &self.minima
    }

    /// True when no value was observed; such a sketch matches nothing.
    pub fn is_degenerate(&self) -> bool {
        self.cardinality_hint == 0
    }

    pub fn is_compatible(&self, other: &Sketch) -> bool {
        self.num_perm() == other.num_perm() && self.seed == other.seed
    }

    pub(crate) fn check_compatible(&self, other: &Sketch) -> Result<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(SketchError::IncompatibleSketches {
                left_perm: self.num_perm(),
                left_seed: self.seed,
                right_perm: other.num_perm(),
                right_seed: other.seed,
            })
        }
    }

    /// Estimated Jaccard similarity, in [0, 1].
    ///
    /// Degenerate sketches have similarity 0 with everything, themselves
    /// included.
    pub fn similarity(&self, other: &Sketch) -> Result<f64> {
        self.check_compatible(other)?;
        if self.is_degenerate() || other.is_degenerate() || self.minima.is_empty() {
            return Ok(0.0);
        }
        let equal = self
            .minima
            .iter()
            .zip(&other.minima)
            .filter(|(left, right)| left == right)
            .count();
        Ok(equal as f64 / self.num_perm() as f64)
    }
}
