//! CLI argument definitions for joinscout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use joinscout_model::MatchConfig;

#[derive(Parser)]
#[command(
    name = "joinscout",
    version,
    about = "Find the tables a newly added column was joined from",
    long_about = "Compare an evolved table with its base version and, for every added \
                  column, search a directory of candidate CSV tables for columns that \
                  contain its values.\n\n\
                  Candidates are ranked by estimated Jaccard similarity and reported \
                  with a likely join type and join key."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one evolved table against a candidate directory.
    Analyze(AnalyzeArgs),

    /// Execute every run listed in a TOML run file.
    Runs(RunsArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Base (original) table.
    #[arg(value_name = "BASE_CSV")]
    pub base: PathBuf,

    /// Evolved table with the added columns.
    #[arg(value_name = "NEW_CSV")]
    pub new: PathBuf,

    /// Directory of candidate CSV tables.
    #[arg(value_name = "CANDIDATE_DIR")]
    pub candidate_dir: PathBuf,

    /// Analyze this column instead of the detected ones (repeatable).
    #[arg(long = "attribute", short = 'a', value_name = "COLUMN")]
    pub attributes: Vec<String>,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormatArg,
}

#[derive(Parser)]
pub struct RunsArgs {
    /// TOML file with `[[run]]` entries and an optional `[config]` table.
    #[arg(value_name = "RUN_FILE")]
    pub run_file: PathBuf,

    /// Tuning flags override the run file's `[config]` for every run.
    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormatArg,
}

/// Overrides for [`MatchConfig`] fields.
#[derive(Args, Default)]
pub struct TuningArgs {
    /// Number of MinHash permutations.
    #[arg(long = "num-perm", value_name = "N")]
    pub num_perm: Option<usize>,

    /// Minimum estimated containment for a candidate column.
    #[arg(long = "threshold", value_name = "T")]
    pub containment_threshold: Option<f64>,

    /// Values sampled per column when searching join keys.
    #[arg(long = "sample-size", value_name = "N")]
    pub sample_size: Option<usize>,

    /// Minimum overlap ratio for a join key.
    #[arg(long = "min-overlap", value_name = "RATIO")]
    pub min_overlap: Option<f64>,

    /// Number of set-size partitions in the containment index.
    #[arg(long = "partitions", value_name = "N")]
    pub num_partitions: Option<usize>,

    /// Maximum rows per LSH band.
    #[arg(long = "max-band-rows", value_name = "N")]
    pub max_band_rows: Option<usize>,

    /// Seed for the MinHash permutations.
    #[arg(long = "sketch-seed", value_name = "SEED")]
    pub sketch_seed: Option<u64>,

    /// Seed for key sampling (random when omitted).
    #[arg(long = "sample-seed", value_name = "SEED")]
    pub sample_seed: Option<u64>,

    /// Expected matched fraction for inner joins.
    #[arg(long = "inner-match-fraction", value_name = "F")]
    pub inner_match_fraction: Option<f64>,

    /// Spread of the inner join likelihood, as a fraction of the smaller table.
    #[arg(long = "inner-std-fraction", value_name = "F")]
    pub inner_std_fraction: Option<f64>,

    /// Baseline cross join likelihood.
    #[arg(long = "cross-epsilon", value_name = "E")]
    pub cross_epsilon: Option<f64>,
}

impl TuningArgs {
    /// Applies the given flags on top of `config`.
    pub fn apply(&self, mut config: MatchConfig) -> MatchConfig {
        if let Some(value) = self.num_perm {
            config.num_perm = value;
        }
        if let Some(value) = self.containment_threshold {
            config.containment_threshold = value;
        }
        if let Some(value) = self.sample_size {
            config.sample_size = value;
        }
        if let Some(value) = self.min_overlap {
            config.min_overlap = value;
        }
        if let Some(value) = self.num_partitions {
            config.num_partitions = value;
        }
        if let Some(value) = self.max_band_rows {
            config.max_band_rows = value;
        }
        if let Some(value) = self.sketch_seed {
            config.sketch_seed = value;
        }
        if self.sample_seed.is_some() {
            config.sample_seed = self.sample_seed;
        }
        if let Some(value) = self.inner_match_fraction {
            config.priors.inner_match_fraction = value;
        }
        if let Some(value) = self.inner_std_fraction {
            config.priors.inner_std_fraction = value;
        }
        if let Some(value) = self.cross_epsilon {
            config.priors.cross_epsilon = value;
        }
        config
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
