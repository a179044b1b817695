// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! doccheck CLI - run the checks written in documentation.

mod config;
mod output;
mod sandbox;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use doccheck_core::{Checker, DiscoveryError, NullReporter, RunReport};

use crate::config::{load_config, ConfigError, Format};

#[derive(Parser, Debug)]
#[command(name = "doccheck", version)]
#[command(about = "Build the examples and run the checks embedded in documentation")]
struct Cli {
    /// Modules to check (default: all)
    #[arg(value_name = "MODULE")]
    modules: Vec<String>,

    /// Config file (default: ./doccheck.toml if present)
    #[arg(long, env = "DOCCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Name bound to the declaration being documented
    #[arg(long)]
    alias: Option<String>,

    /// Tag marker
    #[arg(long)]
    prefix: Option<String>,

    /// Pass when no test or error line is found
    #[arg(long)]
    allow_empty: bool,

    /// List modules and declarations, then exit
    #[arg(long)]
    list: bool,

    /// More logging (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("encoding report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading working directory: {0}")]
    Cwd(#[from] std::io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {}", output::error_label(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Returns the verdict.
fn run(cli: Cli) -> Result<bool, CliError> {
    let cwd = std::env::current_dir()?;
    let mut config = load_config(cli.config.as_deref(), &cwd)?;
    if let Some(alias) = cli.alias {
        config.check.self_alias = alias;
    }
    if let Some(prefix) = cli.prefix {
        config.check.tag_prefix = prefix;
    }
    if cli.allow_empty {
        config.check.require_checks = false;
    }
    let format = cli.format.unwrap_or(config.output.format);
    output::init(config.output.color);
    debug!(?config, ?format, "effective configuration");

    let package = sandbox::package().select(cli.modules);
    if cli.list {
        output::print_modules(&package.selected_modules()?);
        return Ok(true);
    }

    let mut checker = Checker::new(config.check);
    let report = match format {
        Format::Text => {
            let report = checker.run(&package, &mut output::TextReporter::new());
            output::print_summary(&report);
            report
        }
        Format::Json => {
            let report = checker.run(&package, &mut NullReporter);
            print_json(&report)?;
            report
        }
    };
    Ok(report.all_passed())
}

fn print_json(report: &RunReport) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
