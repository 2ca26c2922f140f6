//! In-memory tables and the read capability the matching engine consumes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Inferred value type of a column.
///
/// Two columns are join-compatible only when their types are equal; there is
/// no implicit coercion between types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Integer,
    Float,
    Boolean,
    Text,
    Temporal,
    /// Every cell is missing.
    Null,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Temporal => "temporal",
            Self::Null => "null",
        }
    }

    /// Returns true when a column of this type can be paired with `other`.
    pub fn is_compatible_with(&self, other: ValueType) -> bool {
        *self == other && *self != ValueType::Null
    }
}

/// A named column with its inferred type and cells (`None` = missing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub value_type: ValueType,
    pub values: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, value_type: ValueType, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            value_type,
            values,
        }
    }

    /// Number of rows, including missing cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the present (non-missing) cells.
    pub fn non_null(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(|value| value.as_deref())
    }

}

/// Read capability over a tabular source.
///
/// The sketching, indexing and estimation code only ever sees this trait, so
/// it does not care whether a table came from a CSV file or was built in
/// memory.
pub trait TableSource {
    fn name(&self) -> &str;

    /// Row count including rows whose cells are all missing.
    fn row_count(&self) -> usize;

    fn columns(&self) -> &[Column];

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns().iter().find(|column| column.name == name)
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns().iter().map(|column| column.name.as_str()).collect()
    }
}

/// A fully materialized table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    row_count: usize,
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table, checking that every column has the same length and
    /// that column names are unique.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        let row_count = columns.first().map_or(0, Column::len);
        let mut seen = BTreeSet::new();
        for column in &columns {
            if column.len() != row_count {
                return Err(ModelError::ColumnLength {
                    table: name,
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self {
            name,
            row_count,
            columns,
        })
    }
}

impl TableSource for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}
