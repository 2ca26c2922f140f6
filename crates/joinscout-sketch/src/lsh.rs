//! Banded MinHash hash tables.

use std::collections::{BTreeSet, HashMap};

/// `num_perm / rows` bands of `rows` consecutive minima each. An entry is a
/// candidate for a query when any probed band matches exactly.
#[derive(Debug, Clone)]
pub(crate) struct BandedTable {
    rows: usize,
    bands: Vec<HashMap<Vec<u32>, Vec<usize>>>,
}

impl BandedTable {
    pub(crate) fn new(num_perm: usize, rows: usize) -> Self {
        let band_count = num_perm / rows;
        Self {
            rows,
            bands: vec![HashMap::new(); band_count],
        }
    }

    pub(crate) fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub(crate) fn insert(&mut self, entry: usize, minima: &[u32]) {
        for (idx, band) in self.bands.iter_mut().enumerate() {
            let key = minima[idx * self.rows..(idx + 1) * self.rows].to_vec();
            band.entry(key).or_default().push(entry);
        }
    }

    /// Collects entries sharing any of the first `probe` bands with `minima`.
    pub(crate) fn query_into(&self, minima: &[u32], probe: usize, hits: &mut BTreeSet<usize>) {
        for (idx, band) in self.bands.iter().take(probe).enumerate() {
            let key = &minima[idx * self.rows..(idx + 1) * self.rows];
            if let Some(entries) = band.get(key) {
                hits.extend(entries.iter().copied());
            }
        }
    }
}
