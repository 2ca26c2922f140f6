//! Reading candidate tables from a directory of CSV files.

use std::fs;

use joinscout_ingest::{CsvDirectory, IngestError, TableCatalog};
use joinscout_model::{TableSource, ValueType};
use tempfile::TempDir;

fn write_fixture(dir: &TempDir) {
    fs::write(
        dir.path().join("Financials.csv"),
        "movie_id,revenue,currency\n1,100.5,USD\n2,250,EUR\n3,,USD\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Actors.csv"),
        "actor,born\nSigourney Weaver,1949\nAl Pacino,1940\n",
    )
    .unwrap();
    fs::write(dir.path().join("readme.md"), "not a table").unwrap();
}

#[test]
fn lists_tables_by_file_name() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);
    let catalog = CsvDirectory::open(dir.path()).unwrap();
    assert_eq!(catalog.table_names(), vec!["Actors", "Financials"]);
    assert_eq!(catalog.root(), dir.path());
}

#[test]
fn loads_typed_table() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);
    let catalog = CsvDirectory::open(dir.path()).unwrap();

    let financials = catalog.load_table("Financials").unwrap();
    assert_eq!(financials.name(), "Financials");
    assert_eq!(financials.row_count(), 3);
    assert_eq!(
        financials.column_names(),
        vec!["movie_id", "revenue", "currency"]
    );

    let revenue = financials.column("revenue").unwrap();
    assert_eq!(revenue.value_type, ValueType::Float);
    assert_eq!(
        revenue.values,
        vec![Some("100.5".to_string()), Some("250".to_string()), None]
    );
    assert_eq!(
        financials.column("movie_id").unwrap().value_type,
        ValueType::Integer
    );
}

#[test]
fn unknown_table_is_an_error() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);
    let catalog = CsvDirectory::open(dir.path()).unwrap();
    assert!(matches!(
        catalog.load_table("Ratings"),
        Err(IngestError::TableNotFound { .. })
    ));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = CsvDirectory::open(dir.path().join("nope"));
    assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
}
