//! Table ingestion for joinscout.
//!
//! CSV files are read through Polars and converted to model [`Table`]s with
//! canonical cell text. Candidate tables are reached through the
//! [`TableCatalog`] trait, backed either by memory or by a directory of CSV
//! files.
//!
//! [`Table`]: joinscout_model::Table

pub mod catalog;
pub mod discovery;
pub mod error;
pub mod frame;
pub mod inference;

pub use catalog::{CsvDirectory, MemoryCatalog, TableCatalog};
pub use discovery::{is_csv, list_csv_files, table_name};
pub use error::{IngestError, Result};
pub use frame::{read_table, table_from_dataframe, value_type_of};
pub use inference::{infer_value_type, table_from_rows};
