//! Sampled value overlap between the columns of two tables.
//!
//! Used to find a join key between the base table and a candidate table:
//! only columns of equal [`ValueType`] are compared, values are compared by
//! their exact canonical text, and each column is capped at `sample_size`
//! values.
//!
//! [`ValueType`]: joinscout_model::ValueType

use std::collections::BTreeSet;

use joinscout_model::{Column, KeyPair, TableSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::trace;

/// Overlap ratio of two distinct value sets:
/// `|a ∩ b| / min(|a|, |b|)`, or 0 when either set is empty.
///
/// Symmetric in its arguments.
pub fn overlap_ratio<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let common = a.intersection(b).count();
    common as f64 / smaller as f64
}

/// Finds type-compatible column pairs with enough sampled value overlap.
#[derive(Debug)]
pub struct OverlapKeyFinder {
    sample_size: usize,
    min_overlap: f64,
    rng: StdRng,
}

impl OverlapKeyFinder {
    /// `seed = None` seeds the sampler from OS entropy.
    pub fn new(sample_size: usize, min_overlap: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            sample_size,
            min_overlap,
            rng,
        }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn min_overlap(&self) -> f64 {
        self.min_overlap
    }

    /// Distinct values of a uniform sample of at most `sample_size` present
    /// cells. Columns with at most `sample_size` present cells are used
    /// whole.
    pub fn sample<'a>(&mut self, column: &'a Column) -> BTreeSet<&'a str> {
        let present: Vec<&str> = column.non_null().collect();
        if present.len() <= self.sample_size {
            return present.into_iter().collect();
        }
        present
            .choose_multiple(&mut self.rng, self.sample_size)
            .copied()
            .collect()
    }

    /// Candidate join keys between `left` and `right`, ranked by descending
    /// overlap. Ties keep discovery order: same-name pairs (in `left` column
    /// order) first, then the remaining pairs.
    ///
    /// An empty result means no usable key was found.
    pub fn find<L, R>(&mut self, left: &L, right: &R) -> Vec<KeyPair>
    where
        L: TableSource + ?Sized,
        R: TableSource + ?Sized,
    {
        let left_samples: Vec<BTreeSet<&str>> =
            left.columns().iter().map(|c| self.sample(c)).collect();
        let right_samples: Vec<BTreeSet<&str>> =
            right.columns().iter().map(|c| self.sample(c)).collect();

        let mut pairs = Vec::new();
        let consider = |li: usize, ri: usize, pairs: &mut Vec<KeyPair>| {
            let (lc, rc) = (&left.columns()[li], &right.columns()[ri]);
            if !lc.value_type.is_compatible_with(rc.value_type) {
                return;
            }
            let ratio = overlap_ratio(&left_samples[li], &right_samples[ri]);
            trace!(left = %lc.name, right = %rc.name, ratio, "column overlap");
            if ratio >= self.min_overlap {
                pairs.push(KeyPair::new(lc.name.as_str(), rc.name.as_str(), ratio));
            }
        };

        for (li, lc) in left.columns().iter().enumerate() {
            if let Some(ri) = right.columns().iter().position(|rc| rc.name == lc.name) {
                consider(li, ri, &mut pairs);
            }
        }
        for (li, lc) in left.columns().iter().enumerate() {
            for (ri, rc) in right.columns().iter().enumerate() {
                if lc.name != rc.name {
                    consider(li, ri, &mut pairs);
                }
            }
        }

        pairs.sort_by(|a, b| b.overlap.total_cmp(&a.overlap));
        pairs
    }
}
