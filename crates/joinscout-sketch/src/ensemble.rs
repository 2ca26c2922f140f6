//! LSH Ensemble containment index.
//!
//! Indexed sets are grouped into partitions by size. Every partition keeps
//! one banded table per distinct rows-per-band value chosen by the
//! parameter optimizer. A query probes each partition with the band
//! parameters tuned for the ratio between the partition's upper size bound
//! and the query size, so the containment threshold holds approximately
//! across very different set sizes without comparing against every entry.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::error::{Result, SketchError};
use crate::lsh::BandedTable;
use crate::minhash::Sketch;
use crate::params::ParamTable;
use crate::partition::optimal_partitions;

/// Build parameters of a [`ContainmentIndex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleParams {
    /// Minimum containment of the query in an indexed set (default: 0.1).
    pub threshold: f64,
    /// Permutation count every indexed and query sketch must have (default: 128).
    pub num_perm: usize,
    /// Maximum number of size partitions (default: 16).
    pub num_partitions: usize,
    /// Maximum rows per band (default: 8).
    pub max_band_rows: usize,
    pub false_positive_weight: f64,
    pub false_negative_weight: f64,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            num_perm: 128,
            num_partitions: 16,
            max_band_rows: 8,
            false_positive_weight: 0.5,
            false_negative_weight: 0.5,
        }
    }
}

impl EnsembleParams {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SketchError::parameter(
                "threshold",
                format!("{} is outside [0, 1]", self.threshold),
            ));
        }
        if self.num_perm == 0 {
            return Err(SketchError::parameter("num_perm", "must be positive"));
        }
        if self.num_partitions == 0 {
            return Err(SketchError::parameter("num_partitions", "must be positive"));
        }
        if self.max_band_rows < 2 || self.max_band_rows > self.num_perm {
            return Err(SketchError::parameter(
                "max_band_rows",
                format!("{} is outside [2, {}]", self.max_band_rows, self.num_perm),
            ));
        }
        let weights = self.false_positive_weight + self.false_negative_weight;
        if self.false_positive_weight < 0.0
            || self.false_negative_weight < 0.0
            || (weights - 1.0).abs() > 1e-9
        {
            return Err(SketchError::parameter(
                "weights",
                "false positive and false negative weights must be non-negative and sum to 1",
            ));
        }
        Ok(())
    }
}

/// One indexed set: identifier, sketch and distinct value count.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub sketch: Sketch,
    pub size: usize,
}

impl IndexEntry {
    pub fn new(id: impl Into<String>, sketch: Sketch, size: usize) -> Self {
        Self {
            id: id.into(),
            sketch,
            size,
        }
    }
}

#[derive(Debug, Clone)]
struct Partition {
    lower: usize,
    upper: usize,
    tables: BTreeMap<usize, BandedTable>,
}

/// Read-only approximate containment index.
#[derive(Debug, Clone)]
pub struct ContainmentIndex {
    params: EnsembleParams,
    seed: Option<u64>,
    ids: Vec<String>,
    partitions: Vec<Partition>,
    param_table: ParamTable,
}

impl ContainmentIndex {
    /// Builds the index. Entries with a degenerate sketch or a zero size are
    /// skipped.
    pub fn build(entries: Vec<IndexEntry>, params: EnsembleParams) -> Result<Self> {
        params.validate()?;

        let mut seed = None;
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.sketch.is_degenerate() || entry.size == 0 {
                debug!(id = %entry.id, "skipping empty set");
                continue;
            }
            if entry.sketch.num_perm() != params.num_perm {
                return Err(SketchError::IncompatibleSketches {
                    left_perm: params.num_perm,
                    left_seed: seed.unwrap_or(entry.sketch.seed()),
                    right_perm: entry.sketch.num_perm(),
                    right_seed: entry.sketch.seed(),
                });
            }
            match seed {
                None => seed = Some(entry.sketch.seed()),
                Some(expected) if expected != entry.sketch.seed() => {
                    return Err(SketchError::IncompatibleSketches {
                        left_perm: params.num_perm,
                        left_seed: expected,
                        right_perm: entry.sketch.num_perm(),
                        right_seed: entry.sketch.seed(),
                    });
                }
                Some(_) => {}
            }
            kept.push(entry);
        }

        let param_table = ParamTable::new(
            params.threshold,
            params.num_perm,
            params.max_band_rows,
            params.false_positive_weight,
            params.false_negative_weight,
        );
        let rows = param_table.distinct_rows();

        let mut size_counts: BTreeMap<usize, usize> = BTreeMap::new();
        for entry in &kept {
            *size_counts.entry(entry.size).or_insert(0) += 1;
        }
        let sizes: Vec<usize> = size_counts.keys().copied().collect();
        let counts: Vec<usize> = size_counts.values().copied().collect();
        let mut partitions: Vec<Partition> =
            optimal_partitions(&sizes, &counts, params.num_partitions)
                .into_iter()
                .map(|(lower, upper)| Partition {
                    lower,
                    upper,
                    tables: rows
                        .iter()
                        .map(|&r| (r, BandedTable::new(params.num_perm, r)))
                        .collect(),
                })
                .collect();

        let mut ids = Vec::with_capacity(kept.len());
        for (idx, entry) in kept.into_iter().enumerate() {
            let part = partitions.partition_point(|p| p.upper < entry.size);
            let partition = &mut partitions[part];
            for table in partition.tables.values_mut() {
                table.insert(idx, entry.sketch.minima());
            }
            ids.push(entry.id);
        }

        debug!(
            entries = ids.len(),
            partitions = partitions.len(),
            rows = ?rows,
            "built containment index"
        );
        for partition in &partitions {
            trace!(
                lower = partition.lower,
                upper = partition.upper,
                "index partition"
            );
        }

        Ok(Self {
            params,
            seed,
            ids,
            partitions,
            param_table,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Size ranges of the partitions, ascending.
    pub fn partition_bounds(&self) -> Vec<(usize, usize)> {
        self.partitions
            .iter()
            .map(|partition| (partition.lower, partition.upper))
            .collect()
    }

    /// Identifiers of indexed sets estimated to contain at least the
    /// threshold fraction of the query set, in index order.
    ///
    /// `query_size` is the distinct value count of the query set. A
    /// degenerate sketch or a zero size returns no hits.
    pub fn query(&self, sketch: &Sketch, query_size: usize) -> Result<Vec<&str>> {
        if sketch.num_perm() != self.params.num_perm
            || self.seed.is_some_and(|seed| seed != sketch.seed())
        {
            return Err(SketchError::IncompatibleSketches {
                left_perm: self.params.num_perm,
                left_seed: self.seed.unwrap_or(sketch.seed()),
                right_perm: sketch.num_perm(),
                right_seed: sketch.seed(),
            });
        }
        if sketch.is_degenerate() || query_size == 0 {
            return Ok(Vec::new());
        }

        let mut hits = BTreeSet::new();
        for partition in &self.partitions {
            let (bands, rows) = self.param_table.lookup(partition.upper, query_size);
            trace!(
                upper = partition.upper,
                query_size,
                bands,
                rows,
                "probing partition"
            );
            if let Some(table) = partition.tables.get(&rows) {
                table.query_into(sketch.minima(), bands.min(table.band_count()), &mut hits);
            }
        }
        Ok(hits.into_iter().map(|idx| self.ids[idx].as_str()).collect())
    }
}
