//! Per-column value profiles used to build sketches.

use std::collections::BTreeSet;

use joinscout_common::normalize_value;
use serde::Serialize;

use crate::table::{Column, TableSource};

/// Distinct normalized values and cardinalities of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub table: String,
    pub column: String,
    /// Distinct non-missing values after normalization.
    pub values: BTreeSet<String>,
    /// Row count including missing cells.
    pub row_count: usize,
}

impl ColumnProfile {
    pub fn from_column(table: &str, column: &Column) -> Self {
        Self {
            table: table.to_string(),
            column: column.name.clone(),
            values: normalized_distinct(column),
            row_count: column.len(),
        }
    }

    /// Profiles every column of a table, in column order.
    pub fn profile_table<T: TableSource + ?Sized>(table: &T) -> Vec<Self> {
        table
            .columns()
            .iter()
            .map(|column| Self::from_column(table.name(), column))
            .collect()
    }

    /// Qualified `table.column` identifier.
    pub fn id(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }

    pub fn distinct_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Distinct non-missing cells of a column after [`normalize_value`].
///
/// Cells that become empty after trimming count as missing.
pub fn normalized_distinct(column: &Column) -> BTreeSet<String> {
    column
        .non_null()
        .map(normalize_value)
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Table, ValueType};

    #[test]
    fn profile_normalizes_and_counts_rows_with_nulls() {
        let column = Column::new(
            "title",
            ValueType::Text,
            vec![
                Some("Alien".to_string()),
                Some(" alien ".to_string()),
                None,
                Some("Heat".to_string()),
                Some("  ".to_string()),
            ],
        );
        let table = Table::new("Movies", vec![column]).unwrap();
        let profiles = ColumnProfile::profile_table(&table);
        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.id(), "Movies.title");
        assert_eq!(profile.distinct_count(), 2);
        assert!(profile.values.contains("alien"));
        assert_eq!(profile.row_count, 5);
    }
}
