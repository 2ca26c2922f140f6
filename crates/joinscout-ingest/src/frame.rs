//! Conversion from Polars frames to model tables.

use std::path::Path;

use joinscout_common::any_to_cell;
use joinscout_model::{Column, Table, ValueType};
use polars::prelude::*;
use tracing::debug;

use crate::discovery::table_name;
use crate::error::{IngestError, Result};

/// Maps a Polars dtype to the model's value type.
pub fn value_type_of(dtype: &DataType) -> ValueType {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ValueType::Integer,
        DataType::Float32 | DataType::Float64 => ValueType::Float,
        DataType::Boolean => ValueType::Boolean,
        DataType::Date | DataType::Datetime(_, _) | DataType::Time | DataType::Duration(_) => {
            ValueType::Temporal
        }
        DataType::Null => ValueType::Null,
        _ => ValueType::Text,
    }
}

/// Builds a table from a DataFrame, converting every cell to its canonical
/// text.
///
/// A column whose cells are all missing gets [`ValueType::Null`] whatever
/// dtype Polars gave it.
pub fn table_from_dataframe(name: &str, df: &DataFrame) -> Result<Table> {
    let height = df.height();
    let mut columns = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let mut values = Vec::with_capacity(height);
        for idx in 0..height {
            let cell = col.get(idx).map_err(|e| IngestError::Csv {
                path: name.into(),
                message: e.to_string(),
            })?;
            values.push(any_to_cell(cell));
        }
        let value_type = if values.iter().all(Option::is_none) {
            ValueType::Null
        } else {
            value_type_of(col.dtype())
        };
        columns.push(Column::new(col.name().to_string(), value_type, values));
    }
    Ok(Table::new(name, columns)?)
}

/// Reads a CSV file with a header row into a table named after the file stem.
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|options| options.with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| csv_error(path, &e))?
        .finish()
        .map_err(|e| csv_error(path, &e))?;

    let name = table_name(path);
    debug!(
        table = %name,
        rows = df.height(),
        columns = df.width(),
        "read CSV table"
    );
    table_from_dataframe(&name, &df)
}

fn csv_error(path: &Path, err: &PolarsError) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
