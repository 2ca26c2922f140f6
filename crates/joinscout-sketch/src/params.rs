//! Band parameter selection for containment queries.
//!
//! A banded MinHash index with `b` bands of `r` rows returns a set with
//! Jaccard similarity `s` with probability `1 - (1 - s^r)^b`. For a query of
//! size `q` against indexed sets of size `x`, containment `t` maps to Jaccard
//! `t / (1 + x/q - t)`. The best `(b, r)` for a containment threshold is the
//! pair minimizing the weighted area of false positives below the threshold
//! and false negatives above it.

/// Number of sub-intervals used by [`integrate`]; must be even.
const SIMPSON_STEPS: usize = 64;

/// Composite Simpson's rule over `[lower, upper]`.
pub(crate) fn integrate<F>(f: F, lower: f64, upper: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    if upper <= lower {
        return 0.0;
    }
    let h = (upper - lower) / SIMPSON_STEPS as f64;
    let mut sum = f(lower) + f(upper);
    for i in 1..SIMPSON_STEPS {
        let x = lower + i as f64 * h;
        sum += if i % 2 == 1 { 4.0 * f(x) } else { 2.0 * f(x) };
    }
    sum * h / 3.0
}

fn candidate_probability(t: f64, bands: usize, rows: usize, xq: f64) -> f64 {
    let jaccard = t / (1.0 + xq - t);
    1.0 - (1.0 - jaccard.powi(rows as i32)).powi(bands as i32)
}

pub(crate) fn false_positive_probability(threshold: f64, bands: usize, rows: usize, xq: f64) -> f64 {
    let upper = if xq >= threshold { threshold } else { xq };
    integrate(|t| candidate_probability(t, bands, rows, xq), 0.0, upper)
}

pub(crate) fn false_negative_probability(threshold: f64, bands: usize, rows: usize, xq: f64) -> f64 {
    let miss = |t| 1.0 - candidate_probability(t, bands, rows, xq);
    if xq >= 1.0 {
        integrate(miss, threshold, 1.0)
    } else if xq >= threshold {
        integrate(miss, threshold, xq)
    } else {
        0.0
    }
}

/// Chooses `(bands, rows)` with `bands * rows <= num_perm` and
/// `rows <= max_rows` minimizing the weighted error for size ratio `xq`.
pub(crate) fn optimal_param(
    threshold: f64,
    num_perm: usize,
    max_rows: usize,
    xq: f64,
    false_positive_weight: f64,
    false_negative_weight: f64,
) -> (usize, usize) {
    let mut min_error = f64::INFINITY;
    let mut best = (1, 1);
    for bands in 1..=num_perm {
        for rows in 1..=max_rows {
            if bands * rows > num_perm {
                continue;
            }
            let fp = false_positive_probability(threshold, bands, rows, xq);
            let fn_ = false_negative_probability(threshold, bands, rows, xq);
            let error = fp * false_positive_weight + fn_ * false_negative_weight;
            if error < min_error {
                min_error = error;
                best = (bands, rows);
            }
        }
    }
    best
}

/// Size ratios `x/q` at which parameters are precomputed: `exp(linspace(-5, 5, 10))`.
pub(crate) fn size_ratio_grid() -> Vec<f64> {
    const POINTS: usize = 10;
    (0..POINTS)
        .map(|i| (-5.0 + 10.0 * i as f64 / (POINTS - 1) as f64).exp())
        .collect()
}

/// Precomputed `(bands, rows)` per size ratio.
#[derive(Debug, Clone)]
pub(crate) struct ParamTable {
    ratios: Vec<f64>,
    params: Vec<(usize, usize)>,
}

impl ParamTable {
    pub(crate) fn new(
        threshold: f64,
        num_perm: usize,
        max_rows: usize,
        false_positive_weight: f64,
        false_negative_weight: f64,
    ) -> Self {
        let ratios = size_ratio_grid();
        let params = ratios
            .iter()
            .map(|&xq| {
                optimal_param(
                    threshold,
                    num_perm,
                    max_rows,
                    xq,
                    false_positive_weight,
                    false_negative_weight,
                )
            })
            .collect();
        Self { ratios, params }
    }

    /// Distinct row counts used by any grid point, ascending.
    pub(crate) fn distinct_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.params.iter().map(|&(_, r)| r).collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Parameters for indexed size `x` and query size `q`: the first grid
    /// ratio not below `x/q`, or the last one.
    pub(crate) fn lookup(&self, x: usize, q: usize) -> (usize, usize) {
        let ratio = x as f64 / q as f64;
        let idx = self.ratios.partition_point(|&r| r < ratio);
        self.params[idx.min(self.params.len() - 1)]
    }
}
