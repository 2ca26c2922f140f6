//! Candidate table collections.

use std::path::{Path, PathBuf};

use joinscout_model::{Table, TableSource};
use tracing::debug;

use crate::discovery::{list_csv_files, table_name};
use crate::error::{IngestError, Result};
use crate::frame::read_table;

/// A named collection of candidate tables.
///
/// Table order is stable: [`TableCatalog::table_names`] always returns the
/// same order for the same catalog, and that order decides tie-breaking when
/// candidates are ranked.
pub trait TableCatalog {
    fn table_names(&self) -> Vec<String>;

    fn load_table(&self, name: &str) -> Result<Table>;
}

/// Catalog over tables already held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: Vec<Table>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, replacing any previous table with the same name in
    /// place.
    pub fn insert(&mut self, table: Table) {
        match self.tables.iter_mut().find(|t| t.name() == table.name()) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<Table> for MemoryCatalog {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for table in iter {
            catalog.insert(table);
        }
        catalog
    }
}

impl TableCatalog for MemoryCatalog {
    fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name().to_string()).collect()
    }

    fn load_table(&self, name: &str) -> Result<Table> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| IngestError::TableNotFound {
                name: name.to_string(),
            })
    }
}

/// Catalog over the CSV files of one directory.
///
/// The file list is taken when the catalog is opened; tables are read on
/// demand. Each table is named after its file stem.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
    files: Vec<(String, PathBuf)>,
}

impl CsvDirectory {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let files: Vec<(String, PathBuf)> = list_csv_files(&root)?
            .into_iter()
            .map(|path| (table_name(&path), path))
            .collect();
        debug!(root = %root.display(), tables = files.len(), "opened candidate directory");
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(table, _)| table == name)
            .map(|(_, path)| path.as_path())
    }
}

impl TableCatalog for CsvDirectory {
    fn table_names(&self) -> Vec<String> {
        self.files.iter().map(|(name, _)| name.clone()).collect()
    }

    fn load_table(&self, name: &str) -> Result<Table> {
        let path = self
            .path_of(name)
            .ok_or_else(|| IngestError::TableNotFound {
                name: name.to_string(),
            })?;
        read_table(path)
    }
}
