//! End-to-end analysis of an evolved movies table against candidate tables.

use std::fs;
use std::path::Path;

use joinscout_ingest::{CsvDirectory, IngestError, MemoryCatalog, read_table, table_from_rows};
use joinscout_match::{AttributeMatcher, MatchError};
use joinscout_model::{
    AnalysisResult, AttributeOutcome, AttributeWarning, JoinType, KeyPair, MatchConfig, Table,
};
use tempfile::TempDir;

const MOVIES: usize = 20;

fn revenue(id: usize) -> String {
    (1000 + id * 37).to_string()
}

fn movies_rows(with_revenue: bool) -> Vec<Vec<String>> {
    (1..=MOVIES)
        .map(|id| {
            let mut row = vec![
                id.to_string(),
                format!("Title {id}"),
                if id % 2 == 0 { "drama" } else { "comedy" }.to_string(),
            ];
            if with_revenue {
                row.push(revenue(id));
            }
            row
        })
        .collect()
}

fn financials_rows() -> Vec<Vec<String>> {
    (1..=MOVIES)
        .map(|id| vec![id.to_string(), revenue(id), (500_000 + id * 11).to_string()])
        .collect()
}

fn box_office_rows() -> Vec<Vec<String>> {
    (1..=60)
        .map(|id| vec![format!("Title {id}"), revenue(id)])
        .collect()
}

fn actors_rows() -> Vec<Vec<String>> {
    (1..=15)
        .map(|id| vec![(9000 + id).to_string(), format!("Actor {id}")])
        .collect()
}

fn base() -> Table {
    table_from_rows("Movies", &["id", "title", "genre"], &movies_rows(false)).unwrap()
}

fn evolved() -> Table {
    table_from_rows(
        "Movies_v2",
        &["id", "title", "genre", "revenue"],
        &movies_rows(true),
    )
    .unwrap()
}

fn catalog() -> MemoryCatalog {
    [
        table_from_rows("Actors", &["actor_id", "name"], &actors_rows()).unwrap(),
        table_from_rows("BoxOffice", &["film", "gross"], &box_office_rows()).unwrap(),
        table_from_rows(
            "Financials",
            &["movie_id", "revenue", "budget"],
            &financials_rows(),
        )
        .unwrap(),
    ]
    .into_iter()
    .collect()
}

fn matcher() -> AttributeMatcher {
    AttributeMatcher::new(MatchConfig::default().with_sample_seed(Some(42))).unwrap()
}

fn assert_financials_scenario(result: &AnalysisResult) {
    assert!(matches!(result, AnalysisResult::Success { .. }));
    assert_eq!(result.added_columns(), ["revenue".to_string()]);

    let outcome = result.attribute("revenue").unwrap();
    let matches = outcome.matches();
    assert!(!matches.is_empty(), "outcome {outcome:?}");

    let best = outcome.best().unwrap();
    assert_eq!(best.table, "Financials");
    assert_eq!(best.column, "revenue");
    assert!((best.similarity - 1.0).abs() < f64::EPSILON);
    assert!(best.keys.contains(&KeyPair::new("id", "movie_id", 1.0)));

    assert!(
        matches
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity)
    );
    assert!(matches.iter().all(|m| !m.keys.is_empty()));
    assert!(matches.iter().all(|m| m.table != "Actors"));
}

#[test]
fn financials_supply_revenue() {
    let result = matcher()
        .analyze(&base(), &evolved(), &catalog(), None)
        .unwrap();
    assert_financials_scenario(&result);

    let best = result.attribute("revenue").unwrap().best().unwrap();
    // base, evolved and candidate all have 20 rows
    assert_eq!(best.join.join_type, JoinType::Left);
}

#[test]
fn superset_candidate_ranks_below_exact_match() {
    let result = matcher()
        .analyze(&base(), &evolved(), &catalog(), None)
        .unwrap();
    let matches = result.attribute("revenue").unwrap().matches();
    let box_office = matches
        .iter()
        .find(|m| m.table == "BoxOffice")
        .expect("BoxOffice contains every revenue value");
    assert_eq!(box_office.column, "gross");
    assert!(box_office.similarity < 1.0);
    assert_eq!(box_office.best_key().unwrap().left, "title");
    assert_eq!(box_office.best_key().unwrap().right, "film");
}

#[test]
fn evolved_subset_of_base_has_no_new_attributes() {
    let evolved = table_from_rows("Movies_v2", &["id", "title"], &movies_rows(false)).unwrap();
    let result = matcher()
        .analyze(&base(), &evolved, &catalog(), None)
        .unwrap();
    assert_eq!(
        result,
        AnalysisResult::NoNewAttributes {
            base_table: "Movies".to_string(),
            new_table: "Movies_v2".to_string(),
        }
    );
}

#[test]
fn unmatched_attribute_reports_no_good_matches() {
    let mut rows = movies_rows(true);
    for (idx, row) in rows.iter_mut().enumerate() {
        row[3] = format!("unseen-{idx}");
    }
    let evolved = table_from_rows(
        "Movies_v2",
        &["id", "title", "genre", "studio"],
        &rows,
    )
    .unwrap();
    let result = matcher()
        .analyze(&base(), &evolved, &catalog(), None)
        .unwrap();
    assert_eq!(
        result.attribute("studio"),
        Some(&AttributeOutcome::Warning(AttributeWarning::NoGoodMatches))
    );
}

fn write_csv(dir: &Path, name: &str, headers: &[&str], rows: &[Vec<String>]) {
    let mut text = headers.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    fs::write(dir.join(format!("{name}.csv")), text).unwrap();
}

#[test]
fn csv_directory_scenario() {
    let inputs = TempDir::new().unwrap();
    let candidates = TempDir::new().unwrap();
    write_csv(
        inputs.path(),
        "Movies",
        &["id", "title", "genre"],
        &movies_rows(false),
    );
    write_csv(
        inputs.path(),
        "Movies_v2",
        &["id", "title", "genre", "revenue"],
        &movies_rows(true),
    );
    write_csv(
        candidates.path(),
        "Financials",
        &["movie_id", "revenue", "budget"],
        &financials_rows(),
    );
    write_csv(
        candidates.path(),
        "Actors",
        &["actor_id", "name"],
        &actors_rows(),
    );

    let base = read_table(&inputs.path().join("Movies.csv")).unwrap();
    let evolved = read_table(&inputs.path().join("Movies_v2.csv")).unwrap();
    let catalog = CsvDirectory::open(candidates.path()).unwrap();

    let result = matcher().analyze(&base, &evolved, &catalog, None).unwrap();
    assert_financials_scenario(&result);
    assert_eq!(result.attribute("revenue").unwrap().matches().len(), 1);
}

#[test]
fn unreadable_candidate_table_aborts_analysis() {
    let candidates = TempDir::new().unwrap();
    write_csv(
        candidates.path(),
        "Financials",
        &["movie_id", "revenue", "budget"],
        &financials_rows(),
    );
    write_csv(
        candidates.path(),
        "Actors",
        &["actor_id", "name"],
        &actors_rows(),
    );
    let catalog = CsvDirectory::open(candidates.path()).unwrap();
    fs::remove_file(candidates.path().join("Financials.csv")).unwrap();

    let err = matcher()
        .analyze(&base(), &evolved(), &catalog, None)
        .unwrap_err();
    assert!(
        matches!(err, MatchError::Ingest(IngestError::FileNotFound { .. })),
        "error {err:?}"
    );
}
