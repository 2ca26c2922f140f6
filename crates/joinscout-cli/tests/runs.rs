//! Run files executed end to end against CSV fixtures.

use std::fs;
use std::path::Path;

use joinscout_cli::report::{render_json, render_reports};
use joinscout_cli::runs::{RunFile, RunFileError, execute_all};
use joinscout_model::JoinType;
use tempfile::TempDir;

fn write_csv(path: &Path, headers: &[&str], rows: &[Vec<String>]) {
    let mut text = headers.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

fn movies(with_revenue: bool) -> Vec<Vec<String>> {
    (1..=20)
        .map(|id| {
            let mut row = vec![id.to_string(), format!("Title {id}")];
            if with_revenue {
                row.push((1000 + id * 37).to_string());
            }
            row
        })
        .collect()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let candidates = dir.path().join("candidates");
    fs::create_dir(&candidates).unwrap();
    write_csv(&dir.path().join("movies.csv"), &["id", "title"], &movies(false));
    write_csv(
        &dir.path().join("movies_v2.csv"),
        &["id", "title", "revenue"],
        &movies(true),
    );
    let financials: Vec<Vec<String>> = (1..=20)
        .map(|id| vec![id.to_string(), (1000 + id * 37).to_string()])
        .collect();
    write_csv(
        &candidates.join("Financials.csv"),
        &["movie_id", "revenue"],
        &financials,
    );
    fs::write(
        dir.path().join("runs.toml"),
        r#"
[config]
sample_seed = 42

[[run]]
base_file = "movies.csv"
new_file = "movies_v2.csv"
candidate_dir = "candidates"

[[run]]
base_file = "movies_v2.csv"
new_file = "movies.csv"
candidate_dir = "candidates"
"#,
    )
    .unwrap();
    dir
}

#[test]
fn run_file_reports_best_match() {
    let dir = fixture();
    let file = RunFile::load(&dir.path().join("runs.toml")).unwrap();
    assert_eq!(file.config.sample_seed, Some(42));
    assert_eq!(file.runs[0].base_file, dir.path().join("movies.csv"));

    let reports = execute_all(&file.runs, file.config.clone()).unwrap();
    assert_eq!(reports.len(), 2);

    let best = reports[0]
        .result
        .attribute("revenue")
        .and_then(|outcome| outcome.best())
        .unwrap();
    assert_eq!(best.table, "Financials");
    assert_eq!(best.join.join_type, JoinType::Left);

    let text = render_reports(&reports);
    assert!(text.contains("New attributes detected: revenue"));
    assert!(text.contains(
        "Best match for `revenue`: Financials.revenue obtained through left join on \
         movies.id = Financials.movie_id (Jaccard 1.0000)"
    ));
    assert!(text.contains("No new attributes found in `movies` relative to `movies_v2`."));
}

#[test]
fn json_output_is_tagged() {
    let dir = fixture();
    let file = RunFile::load(&dir.path().join("runs.toml")).unwrap();
    let reports = execute_all(&file.runs, file.config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&render_json(&reports).unwrap()).unwrap();
    assert_eq!(value[0]["result"]["status"], "success");
    assert_eq!(value[0]["result"]["added_columns"][0], "revenue");
    assert_eq!(value[1]["result"]["status"], "no_new_attributes");
}

#[test]
fn missing_base_file_fails_with_context() {
    let dir = fixture();
    let mut file = RunFile::load(&dir.path().join("runs.toml")).unwrap();
    file.runs[0].base_file = dir.path().join("absent.csv");
    let error = execute_all(&file.runs, file.config).unwrap_err();
    assert!(format!("{error:#}").contains("load base table"));
}

#[test]
fn run_file_without_runs_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    fs::write(&path, "[config]\nnum_perm = 64\n").unwrap();
    assert!(matches!(
        RunFile::load(&path),
        Err(RunFileError::Empty { .. })
    ));
}
