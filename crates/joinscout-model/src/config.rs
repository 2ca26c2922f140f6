//! Configuration consumed by the matching engine.
//!
//! Nothing here is global: a [`MatchConfig`] is built by the caller and passed
//! into the matcher explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Heuristic constants of the join-type likelihood model.
///
/// These values are priors chosen by hand, not calibrated against real
/// joins. They are exposed so callers can tune them, and should not be read
/// as statistically validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinTypePriors {
    /// Expected fraction of the smaller table's keys that match (default: 0.5).
    pub inner_match_fraction: f64,
    /// Standard deviation of the inner-join Gaussian, as a fraction of the
    /// smaller table's row count (default: 0.3).
    pub inner_std_fraction: f64,
    /// Baseline likelihood for a cross join (default: 1e-9).
    pub cross_epsilon: f64,
}

impl Default for JoinTypePriors {
    fn default() -> Self {
        Self {
            inner_match_fraction: 0.5,
            inner_std_fraction: 0.3,
            cross_epsilon: 1e-9,
        }
    }
}

/// Tuning parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of MinHash permutations (default: 128).
    pub num_perm: usize,
    /// Minimum estimated containment for an index hit (default: 0.1).
    pub containment_threshold: f64,
    /// Maximum number of values sampled per column for overlap (default: 1000).
    pub sample_size: usize,
    /// Minimum overlap ratio for a join key pair (default: 0.1).
    pub min_overlap: f64,
    /// Number of set-size partitions in the containment index (default: 16).
    pub num_partitions: usize,
    /// Maximum rows per band in the containment index (default: 8).
    pub max_band_rows: usize,
    /// Seed for the MinHash permutations (default: 1).
    pub sketch_seed: u64,
    /// Seed for overlap sampling; `None` draws from OS entropy.
    pub sample_seed: Option<u64>,
    pub priors: JoinTypePriors,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_perm: 128,
            containment_threshold: 0.1,
            sample_size: 1000,
            min_overlap: 0.1,
            num_partitions: 16,
            max_band_rows: 8,
            sketch_seed: 1,
            sample_seed: None,
            priors: JoinTypePriors::default(),
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_num_perm(mut self, num_perm: usize) -> Self {
        self.num_perm = num_perm;
        self
    }

    #[must_use]
    pub fn with_containment_threshold(mut self, threshold: f64) -> Self {
        self.containment_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    #[must_use]
    pub fn with_min_overlap(mut self, min_overlap: f64) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    #[must_use]
    pub fn with_num_partitions(mut self, num_partitions: usize) -> Self {
        self.num_partitions = num_partitions;
        self
    }

    #[must_use]
    pub fn with_max_band_rows(mut self, max_band_rows: usize) -> Self {
        self.max_band_rows = max_band_rows;
        self
    }

    #[must_use]
    pub fn with_sketch_seed(mut self, seed: u64) -> Self {
        self.sketch_seed = seed;
        self
    }

    #[must_use]
    pub fn with_sample_seed(mut self, seed: Option<u64>) -> Self {
        self.sample_seed = seed;
        self
    }

    #[must_use]
    pub fn with_priors(mut self, priors: JoinTypePriors) -> Self {
        self.priors = priors;
        self
    }

    /// Checks ranges that would otherwise make the index or the estimator
    /// meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.num_perm == 0 {
            return Err(ModelError::config("num_perm", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.containment_threshold) {
            return Err(ModelError::config(
                "containment_threshold",
                format!("{} is outside [0, 1]", self.containment_threshold),
            ));
        }
        if self.sample_size == 0 {
            return Err(ModelError::config("sample_size", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.min_overlap) {
            return Err(ModelError::config(
                "min_overlap",
                format!("{} is outside [0, 1]", self.min_overlap),
            ));
        }
        if self.num_partitions == 0 {
            return Err(ModelError::config("num_partitions", "must be positive"));
        }
        if self.max_band_rows < 2 || self.max_band_rows > self.num_perm {
            return Err(ModelError::config(
                "max_band_rows",
                format!("{} is outside [2, {}]", self.max_band_rows, self.num_perm),
            ));
        }
        let priors = &self.priors;
        let positive_std = priors.inner_std_fraction > 0.0;
        let non_negative_fraction = priors.inner_match_fraction >= 0.0;
        if !positive_std || !non_negative_fraction {
            return Err(ModelError::config(
                "priors",
                "inner std fraction must be positive and match fraction non-negative",
            ));
        }
        if priors.cross_epsilon.is_nan() || priors.cross_epsilon < 0.0 {
            return Err(ModelError::config("priors", "cross epsilon must not be negative"));
        }
        Ok(())
    }
}
