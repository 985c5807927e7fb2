//! Data sweeper CLI.

use std::io::{self, IsTerminal};

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use sweep_cli::commands::{run_clean, run_inspect};
use sweep_cli::config::{Settings, load_settings};
use sweep_cli::logging::{LogConfig, LogFormat, init_logging};
use sweep_cli::summary::{print_clean_summary, print_inspect};
use sweep_cli::types::{CleanRequest, InspectRequest};
use sweep_ingest::IngestOptions;
use sweep_model::{CleaningOptions, ColumnSelection};

mod cli;

use crate::cli::{CleanArgs, Cli, Command, InspectArgs, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = load_settings(cli.config.as_deref());
    let result = match &cli.command {
        Command::Clean(args) => clean_request(args, &settings)
            .and_then(|request| run_clean(&request))
            .and_then(|result| print_clean_summary(&result)),
        Command::Inspect(args) => inspect_request(args, &settings)
            .and_then(|request| run_inspect(&request))
            .and_then(|result| print_inspect(&result)),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Merge settings-file values with flags; flags win.
fn clean_request(args: &CleanArgs, settings: &Settings) -> Result<CleanRequest> {
    let cleaning = CleaningOptions {
        missing: args
            .missing
            .map_or(settings.cleaning.missing, Into::into),
        remove_duplicates: settings.cleaning.remove_duplicates && !args.keep_duplicates,
        columns: match &args.columns {
            Some(names) => ColumnSelection::Only(names.iter().map(|n| n.trim().to_string()).collect()),
            None => ColumnSelection::All,
        },
    };
    Ok(CleanRequest {
        file: args.file.clone(),
        ingest: ingest_options(args.separator)?,
        cleaning,
        x: args.x.clone(),
        y: args.y.clone(),
        bins: args
            .bins
            .map_or(settings.charts.bins, |bins| bins as usize),
        format: args.format.map_or(settings.export.format, Into::into),
        output_dir: args
            .output_dir
            .clone()
            .or_else(|| settings.export.output_dir.clone()),
        charts_dir: args.charts_dir.clone(),
        preview_rows: args.preview_rows.unwrap_or(settings.display.preview_rows),
        show_rows: args.show_rows.or(settings.display.show_rows),
        dry_run: args.dry_run,
    })
}

fn inspect_request(args: &InspectArgs, settings: &Settings) -> Result<InspectRequest> {
    Ok(InspectRequest {
        file: args.file.clone(),
        ingest: ingest_options(args.separator)?,
        preview_rows: args.preview_rows.unwrap_or(settings.display.preview_rows),
    })
}

fn ingest_options(separator: char) -> Result<IngestOptions> {
    let Ok(byte) = u8::try_from(separator) else {
        bail!("separator must be a single-byte character, got {separator:?}");
    };
    Ok(IngestOptions::default().with_separator(byte))
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
