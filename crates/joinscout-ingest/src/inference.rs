//! Value type inference for tables built from raw text rows.
//!
//! Polars infers types while reading CSV files; tables assembled in memory
//! from string rows go through the same rules here so that both kinds of
//! source produce identical canonical cells.

use joinscout_common::canonical_float;
use joinscout_model::{Column, Table, ValueType};

use crate::error::Result;

/// Infers the narrowest type that every present cell parses as.
///
/// Order of preference: integer, float, boolean, text. Blank cells are
/// ignored; a column without present cells is [`ValueType::Null`].
pub fn infer_value_type<'a, I>(cells: I) -> ValueType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen_any = false;
    let mut integer = true;
    let mut float = true;
    let mut boolean = true;
    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        seen_any = true;
        integer &= cell.parse::<i64>().is_ok();
        float &= cell.parse::<f64>().is_ok();
        boolean &= parse_bool(cell).is_some();
        if !(integer || float || boolean) {
            return ValueType::Text;
        }
    }
    match (seen_any, integer, float, boolean) {
        (false, ..) => ValueType::Null,
        (true, true, _, _) => ValueType::Integer,
        (true, false, true, _) => ValueType::Float,
        (true, false, false, true) => ValueType::Boolean,
        _ => ValueType::Text,
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Canonical text of a cell already known to be of `value_type`.
fn canonical_cell(raw: &str, value_type: ValueType) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match value_type {
        ValueType::Integer => trimmed.parse::<i64>().ok().map(|v| v.to_string()),
        ValueType::Float => canonical_float(trimmed),
        ValueType::Boolean => parse_bool(trimmed).map(|v| v.to_string()),
        _ => Some(trimmed.to_string()),
    }
}

/// Builds a typed table from a header and string rows.
///
/// Short rows are padded with missing cells; cells beyond the header are
/// dropped.
pub fn table_from_rows<H, R, S>(name: &str, headers: &[H], rows: &[R]) -> Result<Table>
where
    H: AsRef<str>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let columns = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let raw: Vec<&str> = rows
                .iter()
                .map(|row| row.as_ref().get(idx).map_or("", AsRef::as_ref))
                .collect();
            let value_type = infer_value_type(raw.iter().copied());
            let values = raw
                .iter()
                .map(|cell| canonical_cell(cell, value_type))
                .collect();
            Column::new(header.as_ref().trim(), value_type, values)
        })
        .collect();
    Ok(Table::new(name, columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use joinscout_model::TableSource;

    #[test]
    fn test_infer_value_type() {
        assert_eq!(infer_value_type(["1", "2", ""]), ValueType::Integer);
        assert_eq!(infer_value_type(["1", "2.5"]), ValueType::Float);
        assert_eq!(infer_value_type(["true", "FALSE"]), ValueType::Boolean);
        assert_eq!(infer_value_type(["1", "abc"]), ValueType::Text);
        assert_eq!(infer_value_type(["", "  "]), ValueType::Null);
        assert_eq!(infer_value_type(Vec::<&str>::new()), ValueType::Null);
    }

    #[test]
    fn test_table_from_rows() {
        let table = table_from_rows(
            "Financials",
            &["movie_id", "revenue", "flag"],
            &[["1", "100.50", "true"], ["2", "", "False"], ["03", "7", ""]],
        )
        .unwrap();
        assert_eq!(table.row_count(), 3);

        let ids = table.column("movie_id").unwrap();
        assert_eq!(ids.value_type, ValueType::Integer);
        assert_eq!(ids.values[2], Some("3".to_string()));

        let revenue = table.column("revenue").unwrap();
        assert_eq!(revenue.value_type, ValueType::Float);
        assert_eq!(
            revenue.values,
            vec![Some("100.5".to_string()), None, Some("7".to_string())]
        );

        let flag = table.column("flag").unwrap();
        assert_eq!(flag.value_type, ValueType::Boolean);
        assert_eq!(flag.values[1], Some("false".to_string()));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let rows = vec![vec!["a", "1"], vec!["b"]];
        let table = table_from_rows("t", &["name", "n"], &rows).unwrap();
        assert_eq!(table.column("n").unwrap().values, vec![Some("1".to_string()), None]);
    }
}
