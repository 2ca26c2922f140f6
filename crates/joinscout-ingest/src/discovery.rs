//! Candidate file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists all CSV files directly inside a directory.
///
/// Returns files sorted by filename. Subdirectories are not traversed.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if path.is_file() && is_csv(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Case-insensitive `.csv` extension check.
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Table name for a CSV path: the file stem.
pub fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in ["Movies.csv", "Financials.CSV", "notes.txt", "Actors.csv"] {
            std::fs::write(dir.path().join(name), "id\n1").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();
        dir
    }

    #[test]
    fn test_list_csv_files() {
        let dir = create_test_dir();
        let files = list_csv_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|path| table_name(path)).collect();
        assert_eq!(names, vec!["Actors", "Financials", "Movies"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");
        assert!(matches!(
            list_csv_files(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_table_name() {
        assert_eq!(table_name(Path::new("/data/Financials.csv")), "Financials");
        assert_eq!(table_name(Path::new("plain")), "plain");
    }
}
