//! joinscout CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use joinscout_cli::logging::{LogConfig, LogFormat, init_logging};
use joinscout_cli::report::{render_json, render_reports};
use joinscout_cli::runs::{RunFile, RunReport, RunSpec, execute_all};
use joinscout_model::MatchConfig;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{AnalyzeArgs, Cli, Command, LogFormatArg, LogLevelArg, ReportFormatArg, RunsArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Runs(args) => run_file(args),
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let run = RunSpec {
        base_file: args.base.clone(),
        new_file: args.new.clone(),
        candidate_dir: args.candidate_dir.clone(),
        new_attributes: args.attributes.clone(),
    };
    let config = args.tuning.apply(MatchConfig::default());
    let reports = execute_all(std::slice::from_ref(&run), config)?;
    print_reports(&reports, args.format)
}

fn run_file(args: &RunsArgs) -> Result<()> {
    let file = RunFile::load(&args.run_file)?;
    let config = args.tuning.apply(file.config);
    let reports = execute_all(&file.runs, config)?;
    print_reports(&reports, args.format)
}

fn print_reports(reports: &[RunReport], format: ReportFormatArg) -> Result<()> {
    match format {
        ReportFormatArg::Text => print!("{}", render_reports(reports)),
        ReportFormatArg::Json => {
            let json = render_json(reports).context("serialize reports")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
