//! Join type estimation from row counts.
//!
//! Each join type gets an unnormalized likelihood from the sizes of the two
//! inputs and of the joined result:
//!
//! - inner: Gaussian around `inner_match_fraction * min`
//! - left / right: exponential decay away from the left / right row count
//! - full: triangular, peaking at `max`, reaching zero at `orig + ext`
//! - cross: a small baseline, or 1 when the result is exactly `orig * ext`
//!
//! The likelihoods are normalized into a distribution and the most likely
//! type is returned. Only cardinalities are used, never values.

use joinscout_model::{JoinEstimate, JoinType, JoinTypePriors};

/// Stateless classifier; see the module docs for the model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoinTypeEstimator {
    priors: JoinTypePriors,
}

impl JoinTypeEstimator {
    pub fn new(priors: JoinTypePriors) -> Self {
        Self { priors }
    }

    /// Unnormalized likelihoods in [`JoinType::ALL`] order.
    pub fn likelihoods(&self, orig_rows: usize, ext_rows: usize, joined_rows: usize) -> [f64; 5] {
        let orig = orig_rows as f64;
        let ext = ext_rows as f64;
        let joined = joined_rows as f64;
        let min = orig.min(ext);
        let max = orig.max(ext);
        let sum = orig + ext;

        let inner = if min > 0.0 {
            let mu = min * self.priors.inner_match_fraction;
            let sigma = min * self.priors.inner_std_fraction;
            (-(joined - mu).powi(2) / (2.0 * sigma * sigma)).exp()
        } else {
            0.0
        };

        let left = decay(joined, orig);
        let right = decay(joined, ext);

        let full = if max < sum {
            let value = if joined <= max {
                joined / sum
            } else {
                (sum - joined) / sum
            };
            value.max(0.0)
        } else {
            0.0
        };

        let cross = if joined_rows as u128 == orig_rows as u128 * ext_rows as u128 {
            1.0
        } else {
            self.priors.cross_epsilon
        };

        [inner, left, right, full, cross]
    }

    /// Most probable join type with its normalized probability.
    ///
    /// Ties resolve in [`JoinType::ALL`] order. When every likelihood is zero
    /// (only possible with a zero cross epsilon) the distribution is uniform.
    pub fn estimate(&self, orig_rows: usize, ext_rows: usize, joined_rows: usize) -> JoinEstimate {
        let likelihoods = self.likelihoods(orig_rows, ext_rows, joined_rows);
        let total: f64 = likelihoods.iter().sum();
        let distribution = if total > 0.0 && total.is_finite() {
            likelihoods.map(|value| value / total)
        } else {
            [1.0 / JoinType::ALL.len() as f64; 5]
        };

        let mut best = 0;
        for (idx, probability) in distribution.iter().enumerate().skip(1) {
            if *probability > distribution[best] {
                best = idx;
            }
        }

        JoinEstimate {
            join_type: JoinType::ALL[best],
            probability: distribution[best],
            distribution,
        }
    }
}

/// `exp(-0.5 * |joined - rows| / rows)`, or 0 when `rows` is 0.
fn decay(joined: f64, rows: f64) -> f64 {
    if rows > 0.0 {
        (-0.5 * (joined - rows).abs() / rows).exp()
    } else {
        0.0
    }
}
