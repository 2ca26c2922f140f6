//! Attribute match orchestration.
//!
//! For every column the evolved table adds over the base table, the matcher
//! looks for candidate columns that contain its values, estimates how the
//! candidate table would be joined and which columns serve as the key, and
//! ranks the survivors by estimated Jaccard similarity.

use std::collections::{BTreeMap, HashMap};

use joinscout_ingest::TableCatalog;
use joinscout_model::{
    AnalysisResult, AttributeOutcome, AttributeResult, AttributeWarning, ColumnProfile,
    JoinCandidate, KeyPair, MatchConfig, Table, TableSource, normalized_distinct,
};
use joinscout_sketch::{ContainmentIndex, EnsembleParams, IndexEntry, Permutations, Sketch};
use tracing::{debug, info, info_span, warn};

use crate::error::Result;
use crate::join_type::JoinTypeEstimator;
use crate::overlap::OverlapKeyFinder;

/// Columns to analyze: the explicit list when given (de-duplicated, order
/// kept), otherwise evolved columns missing from the base table in evolved
/// column order.
pub fn added_columns<B, E>(base: &B, evolved: &E, explicit: Option<&[String]>) -> Vec<String>
where
    B: TableSource + ?Sized,
    E: TableSource + ?Sized,
{
    match explicit {
        Some(names) if !names.is_empty() => {
            let mut seen = Vec::with_capacity(names.len());
            for name in names {
                if !seen.contains(name) {
                    seen.push(name.clone());
                }
            }
            seen
        }
        _ => evolved
            .column_names()
            .into_iter()
            .filter(|name| base.column(name).is_none())
            .map(str::to_string)
            .collect(),
    }
}

/// One indexed candidate column.
#[derive(Debug)]
struct IndexedColumn {
    table: usize,
    profile: ColumnProfile,
    sketch: Sketch,
}

/// Candidate tables loaded for one analysis, with their indexed columns.
#[derive(Debug)]
struct CandidateSet {
    tables: Vec<Table>,
    columns: Vec<IndexedColumn>,
    by_id: HashMap<String, usize>,
    index: ContainmentIndex,
}

/// Finds, for newly added attributes, the candidate tables that can supply
/// them through a join.
#[derive(Debug, Clone)]
pub struct AttributeMatcher {
    config: MatchConfig,
    permutations: Permutations,
    estimator: JoinTypeEstimator,
}

impl AttributeMatcher {
    /// Validates the configuration and derives the MinHash permutations.
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        let permutations = Permutations::new(config.num_perm, config.sketch_seed);
        let estimator = JoinTypeEstimator::new(config.priors);
        Ok(Self {
            config,
            permutations,
            estimator,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    fn ensemble_params(&self) -> EnsembleParams {
        EnsembleParams {
            threshold: self.config.containment_threshold,
            num_perm: self.config.num_perm,
            num_partitions: self.config.num_partitions,
            max_band_rows: self.config.max_band_rows,
            ..EnsembleParams::default()
        }
    }

    /// Analyzes the columns `evolved` adds over `base` against every table
    /// of `catalog`.
    ///
    /// `explicit` overrides the detected added columns. Failing to load a
    /// catalog table aborts the call; attributes without values or without
    /// usable candidates are reported as warnings.
    pub fn analyze<B, E, C>(
        &self,
        base: &B,
        evolved: &E,
        catalog: &C,
        explicit: Option<&[String]>,
    ) -> Result<AnalysisResult>
    where
        B: TableSource + ?Sized,
        E: TableSource + ?Sized,
        C: TableCatalog + ?Sized,
    {
        let span = info_span!("analysis", base = base.name(), evolved = evolved.name());
        let _guard = span.enter();

        let added = added_columns(base, evolved, explicit);
        if added.is_empty() {
            info!("no new attributes");
            return Ok(AnalysisResult::NoNewAttributes {
                base_table: base.name().to_string(),
                new_table: evolved.name().to_string(),
            });
        }
        info!(added = ?added, "analyzing new attributes");

        let candidates = self.index_catalog(catalog)?;
        let mut finder = OverlapKeyFinder::new(
            self.config.sample_size,
            self.config.min_overlap,
            self.config.sample_seed,
        );
        let mut key_cache: BTreeMap<usize, Vec<KeyPair>> = BTreeMap::new();

        let mut attributes = Vec::with_capacity(added.len());
        for attribute in &added {
            let span = info_span!("attribute", name = %attribute);
            let _guard = span.enter();
            let outcome = self.match_attribute(
                base,
                evolved,
                attribute,
                &candidates,
                &mut finder,
                &mut key_cache,
            )?;
            attributes.push(AttributeResult {
                attribute: attribute.clone(),
                outcome,
            });
        }

        Ok(AnalysisResult::Success {
            base_table: base.name().to_string(),
            new_table: evolved.name().to_string(),
            added_columns: added,
            attributes,
        })
    }

    /// Loads every catalog table once, profiles and sketches its columns and
    /// builds the containment index.
    fn index_catalog<C: TableCatalog + ?Sized>(&self, catalog: &C) -> Result<CandidateSet> {
        let mut tables = Vec::new();
        let mut columns = Vec::new();
        let mut by_id = HashMap::new();
        let mut entries = Vec::new();

        for name in catalog.table_names() {
            let table = catalog.load_table(&name)?;
            let table_idx = tables.len();
            for profile in ColumnProfile::profile_table(&table) {
                if profile.is_empty() {
                    debug!(column = %profile.id(), "skipping column without values");
                    continue;
                }
                let id = profile.id();
                if by_id.contains_key(&id) {
                    warn!(column = %id, "duplicate candidate column id, keeping the first");
                    continue;
                }
                let sketch = self
                    .permutations
                    .sketch_normalized(profile.values.iter().map(String::as_str));
                entries.push(IndexEntry::new(
                    id.clone(),
                    sketch.clone(),
                    profile.distinct_count(),
                ));
                by_id.insert(id, columns.len());
                columns.push(IndexedColumn {
                    table: table_idx,
                    profile,
                    sketch,
                });
            }
            tables.push(table);
        }

        let index = ContainmentIndex::build(entries, self.ensemble_params())?;
        info!(
            tables = tables.len(),
            columns = index.len(),
            "indexed candidate columns"
        );
        Ok(CandidateSet {
            tables,
            columns,
            by_id,
            index,
        })
    }

    fn match_attribute<B, E>(
        &self,
        base: &B,
        evolved: &E,
        attribute: &str,
        candidates: &CandidateSet,
        finder: &mut OverlapKeyFinder,
        key_cache: &mut BTreeMap<usize, Vec<KeyPair>>,
    ) -> Result<AttributeOutcome>
    where
        B: TableSource + ?Sized,
        E: TableSource + ?Sized,
    {
        let Some(column) = evolved.column(attribute) else {
            warn!("attribute is not a column of the evolved table");
            return Ok(AttributeOutcome::Warning(AttributeWarning::NoValues));
        };
        let values = normalized_distinct(column);
        if values.is_empty() {
            debug!("attribute has no values");
            return Ok(AttributeOutcome::Warning(AttributeWarning::NoValues));
        }

        let sketch = self
            .permutations
            .sketch_normalized(values.iter().map(String::as_str));
        let hits = candidates.index.query(&sketch, values.len())?;
        debug!(hits = hits.len(), "containment index hits");

        let mut ranked = Vec::new();
        for id in hits {
            let Some(&column_idx) = candidates.by_id.get(id) else {
                continue;
            };
            let indexed = &candidates.columns[column_idx];
            let similarity = sketch.similarity(&indexed.sketch)?;
            // The candidate column's row count stands in for the joined row
            // count; no join is executed.
            let join = self.estimator.estimate(
                base.row_count(),
                evolved.row_count(),
                indexed.profile.row_count,
            );
            let keys = key_cache
                .entry(indexed.table)
                .or_insert_with(|| finder.find(base, &candidates.tables[indexed.table]))
                .clone();
            if keys.is_empty() {
                debug!(candidate = %id, "no join key with the base table");
                continue;
            }
            ranked.push(JoinCandidate {
                table: indexed.profile.table.clone(),
                column: indexed.profile.column.clone(),
                similarity,
                join,
                keys,
            });
        }

        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        if ranked.is_empty() {
            return Ok(AttributeOutcome::Warning(AttributeWarning::NoGoodMatches));
        }
        info!(
            candidates = ranked.len(),
            best = %format!("{}.{}", ranked[0].table, ranked[0].column),
            "matched attribute"
        );
        Ok(AttributeOutcome::Matches(ranked))
    }
}
