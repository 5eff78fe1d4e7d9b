//! `pricemap` command-line interface.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use pricemap_cli::logging::{LogConfig, LogFormat, init_logging};
use pricemap_cli::summary::{print_analysis, print_summary};
use pricemap_model::ProcessorKind;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{load, run_analyze, run_normalize, run_rows, run_schemas};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let standards = load(cli.standards.as_deref())?;
    let result = match &cli.command {
        Command::Normalize(args) => run_normalize(args, &standards)?,
        Command::Rewrite(args) => run_rows(args, ProcessorKind::GoodsMovement, &standards)?,
        Command::Multiplicity(args) => run_rows(args, ProcessorKind::Multiplicity, &standards)?,
        Command::Analyze(args) => {
            let report = run_analyze(args, &standards)?;
            print_analysis(&report);
            return Ok(if report.success() { 0 } else { 1 });
        }
        Command::Schemas => {
            run_schemas(&standards);
            return Ok(0);
        }
    };
    print_summary(&result);
    Ok(if result.has_failures() { 1 } else { 0 })
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
