//! Human-readable and JSON rendering of run reports.

use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use joinscout_model::{AnalysisResult, AttributeOutcome, JoinCandidate};

use crate::runs::RunReport;

/// Candidates shown per attribute.
pub const TOP_CANDIDATES: usize = 5;

const RULE: &str = "==================================================";

/// Renders every report, separated by a rule line.
pub fn render_reports(reports: &[RunReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&render_report(report));
    }
    out
}

/// Header naming the analyzed file followed by the analysis result.
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Analyzing: {}", report.run.new_file.display());
    let _ = writeln!(out, "Base: {}", report.run.base_file.display());
    let _ = writeln!(out, "Candidates: {}", report.run.candidate_dir.display());
    let _ = writeln!(out, "{RULE}");
    out.push_str(&render_result(&report.result));
    out
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    match result {
        AnalysisResult::NoNewAttributes {
            base_table,
            new_table,
        } => {
            let _ = writeln!(
                out,
                "No new attributes found in `{new_table}` relative to `{base_table}`."
            );
        }
        AnalysisResult::Success {
            base_table,
            added_columns,
            attributes,
            ..
        } => {
            let _ = writeln!(out, "New attributes detected: {}", added_columns.join(", "));
            for attribute in attributes {
                let _ = writeln!(out);
                let _ = writeln!(out, "Attribute `{}`", attribute.attribute);
                match &attribute.outcome {
                    AttributeOutcome::Warning(warning) => {
                        let _ = writeln!(out, "  warning: {}", warning.message());
                    }
                    AttributeOutcome::Matches(candidates) => {
                        let _ = writeln!(out, "{}", candidate_table(base_table, candidates));
                        let hidden = candidates.len().saturating_sub(TOP_CANDIDATES);
                        if hidden > 0 {
                            let _ = writeln!(out, "  ... and {hidden} more candidates");
                        }
                        if let Some(best) = candidates.first() {
                            let _ = writeln!(
                                out,
                                "{}",
                                best_match_line(&attribute.attribute, base_table, best)
                            );
                        }
                    }
                }
            }
        }
    }
    out
}

/// One-line summary of the top candidate and how to join it.
pub fn best_match_line(attribute: &str, base_table: &str, best: &JoinCandidate) -> String {
    let source = format!("{}.{}", best.table, best.column);
    match best.best_key() {
        Some(key) => format!(
            "Best match for `{attribute}`: {source} obtained through {join} join on \
             {base_table}.{left} = {table}.{right} (Jaccard {similarity:.4})",
            join = best.join.join_type,
            left = key.left,
            table = best.table,
            right = key.right,
            similarity = best.similarity,
        ),
        None => format!(
            "Best match for `{attribute}`: {source} (Jaccard {:.4})",
            best.similarity
        ),
    }
}

/// Pretty-printed JSON of the reports.
pub fn render_json(reports: &[RunReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

fn candidate_table(base_table: &str, candidates: &[JoinCandidate]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Candidate"),
        header_cell("Jaccard"),
        header_cell("Join"),
        header_cell("P(join)"),
        header_cell("Key"),
        header_cell("Overlap"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);

    for (rank, candidate) in candidates.iter().take(TOP_CANDIDATES).enumerate() {
        let (key, overlap) = match candidate.best_key() {
            Some(key) => (
                Cell::new(format!(
                    "{base_table}.{} = {}.{}",
                    key.left, candidate.table, key.right
                )),
                Cell::new(format!("{:.2}", key.overlap)),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{}.{}", candidate.table, candidate.column))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(format!("{:.4}", candidate.similarity)),
            Cell::new(candidate.join.join_type),
            Cell::new(format!("{:.3}", candidate.join.probability)),
            key,
            overlap,
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use joinscout_model::{
        AttributeResult, AttributeWarning, JoinEstimate, JoinType, KeyPair,
    };

    fn candidate(table: &str, column: &str, similarity: f64) -> JoinCandidate {
        JoinCandidate {
            table: table.to_string(),
            column: column.to_string(),
            similarity,
            join: JoinEstimate {
                join_type: JoinType::Left,
                probability: 0.6,
                distribution: [0.1, 0.6, 0.1, 0.2, 0.0],
            },
            keys: vec![KeyPair::new("id", "movie_id", 1.0)],
        }
    }

    #[test]
    fn best_line_names_join_and_key() {
        let line = best_match_line("revenue", "Movies", &candidate("Financials", "revenue", 1.0));
        assert_eq!(
            line,
            "Best match for `revenue`: Financials.revenue obtained through left join on \
             Movies.id = Financials.movie_id (Jaccard 1.0000)"
        );
    }

    #[test]
    fn no_new_attributes_message() {
        let text = render_result(&AnalysisResult::NoNewAttributes {
            base_table: "Movies".to_string(),
            new_table: "Movies_v2".to_string(),
        });
        assert_eq!(
            text,
            "No new attributes found in `Movies_v2` relative to `Movies`.\n"
        );
    }

    #[test]
    fn shows_top_candidates_and_warnings() {
        let candidates: Vec<JoinCandidate> = (0..7)
            .map(|idx| candidate(&format!("T{idx}"), "revenue", 1.0 - idx as f64 * 0.1))
            .collect();
        let result = AnalysisResult::Success {
            base_table: "Movies".to_string(),
            new_table: "Movies_v2".to_string(),
            added_columns: vec!["revenue".to_string(), "studio".to_string()],
            attributes: vec![
                AttributeResult {
                    attribute: "revenue".to_string(),
                    outcome: AttributeOutcome::Matches(candidates),
                },
                AttributeResult {
                    attribute: "studio".to_string(),
                    outcome: AttributeOutcome::Warning(AttributeWarning::NoGoodMatches),
                },
            ],
        };
        let text = render_result(&result);
        assert!(text.starts_with("New attributes detected: revenue, studio\n"));
        assert!(text.contains("T4.revenue"));
        assert!(!text.contains("T5.revenue"));
        assert!(text.contains("... and 2 more candidates"));
        assert!(text.contains("Best match for `revenue`: T0.revenue"));
        assert!(text.contains("warning: No good matches found"));
    }
}
