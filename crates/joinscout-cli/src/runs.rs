//! Analysis runs: a base table, its evolved version and a candidate
//! directory, either given on the command line or listed in a TOML run file.
//!
//! ```toml
//! [config]
//! num_perm = 256
//!
//! [[run]]
//! base_file = "data/movies.csv"
//! new_file = "data/movies_v2.csv"
//! candidate_dir = "data/candidates"
//! new_attributes = ["revenue"]
//! ```
//!
//! Relative paths are resolved against the directory holding the run file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use joinscout_ingest::{CsvDirectory, read_table};
use joinscout_match::AttributeMatcher;
use joinscout_model::{AnalysisResult, MatchConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, info_span};

/// Errors raised while loading a run file.
#[derive(Debug, Error)]
pub enum RunFileError {
    #[error("failed to read run file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse run file {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("run file {path} lists no runs")]
    Empty { path: PathBuf },
}

/// One analysis: which columns `new_file` adds over `base_file`, and where
/// in `candidate_dir` they could come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub base_file: PathBuf,
    pub new_file: PathBuf,
    pub candidate_dir: PathBuf,
    /// Explicit attributes; empty means detect added columns.
    #[serde(default)]
    pub new_attributes: Vec<String>,
}

impl RunSpec {
    fn resolve_against(mut self, root: &Path) -> Self {
        for path in [
            &mut self.base_file,
            &mut self.new_file,
            &mut self.candidate_dir,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    fn explicit_attributes(&self) -> Option<&[String]> {
        if self.new_attributes.is_empty() {
            None
        } else {
            Some(self.new_attributes.as_slice())
        }
    }
}

/// Parsed contents of a run file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunFile {
    /// Tuning shared by every run; missing fields keep their defaults.
    #[serde(default)]
    pub config: MatchConfig,
    #[serde(default, rename = "run")]
    pub runs: Vec<RunSpec>,
}

impl RunFile {
    /// Reads and parses `path`, resolving relative run paths against its
    /// parent directory.
    pub fn load(path: &Path) -> Result<Self, RunFileError> {
        let contents = fs::read_to_string(path).map_err(|source| RunFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: RunFile = toml::from_str(&contents).map_err(|source| RunFileError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if parsed.runs.is_empty() {
            return Err(RunFileError::Empty {
                path: path.to_path_buf(),
            });
        }
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            config: parsed.config,
            runs: parsed
                .runs
                .into_iter()
                .map(|run| run.resolve_against(root))
                .collect(),
        })
    }
}

/// A finished run with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run: RunSpec,
    pub result: AnalysisResult,
}

/// Loads the run's tables and analyzes them with `matcher`.
pub fn execute(run: &RunSpec, matcher: &AttributeMatcher) -> anyhow::Result<RunReport> {
    let span = info_span!("run", new_file = %run.new_file.display());
    let _guard = span.enter();

    let base = read_table(&run.base_file)
        .with_context(|| format!("load base table {}", run.base_file.display()))?;
    let evolved = read_table(&run.new_file)
        .with_context(|| format!("load new table {}", run.new_file.display()))?;
    let catalog = CsvDirectory::open(&run.candidate_dir).with_context(|| {
        format!("open candidate directory {}", run.candidate_dir.display())
    })?;
    let result = matcher
        .analyze(&base, &evolved, &catalog, run.explicit_attributes())
        .with_context(|| format!("analyze {}", run.new_file.display()))?;
    info!(added = result.added_columns().len(), "run finished");
    Ok(RunReport {
        run: run.clone(),
        result,
    })
}

/// Executes the runs in order with one matcher built from `config`.
///
/// Stops at the first failing run.
pub fn execute_all(runs: &[RunSpec], config: MatchConfig) -> anyhow::Result<Vec<RunReport>> {
    let matcher = AttributeMatcher::new(config).context("invalid match configuration")?;
    runs.iter().map(|run| execute(run, &matcher)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_runs_and_partial_config() {
        let text = r#"
            [config]
            num_perm = 64
            max_band_rows = 4

            [[run]]
            base_file = "movies.csv"
            new_file = "movies_v2.csv"
            candidate_dir = "candidates"

            [[run]]
            base_file = "/abs/a.csv"
            new_file = "/abs/b.csv"
            candidate_dir = "/abs/c"
            new_attributes = ["revenue"]
        "#;
        let file: RunFile = toml::from_str(text).unwrap();
        assert_eq!(file.config.num_perm, 64);
        assert_eq!(file.config.max_band_rows, 4);
        assert_eq!(file.config.sample_size, 1000);
        assert_eq!(file.runs.len(), 2);
        assert!(file.runs[0].new_attributes.is_empty());
        assert_eq!(file.runs[1].new_attributes, vec!["revenue".to_string()]);
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let run = RunSpec {
            base_file: PathBuf::from("a.csv"),
            new_file: PathBuf::from("/data/b.csv"),
            candidate_dir: PathBuf::from("cands"),
            new_attributes: Vec::new(),
        }
        .resolve_against(Path::new("/runs"));
        assert_eq!(run.base_file, PathBuf::from("/runs/a.csv"));
        assert_eq!(run.new_file, PathBuf::from("/data/b.csv"));
        assert_eq!(run.candidate_dir, PathBuf::from("/runs/cands"));
        assert_eq!(run.explicit_attributes(), None);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let text = r#"
            [[run]]
            base_file = "a.csv"
            candidate_dir = "c"
        "#;
        assert!(toml::from_str::<RunFile>(text).is_err());
    }
}
