//! Lintrap CLI
//!
//! Configurable linter for plain text files.

mod cli;
mod commands;
mod linters;

use std::process::ExitCode;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use lintrap_core::{Application, Configuration, EXIT_SOFTWARE, EXIT_USAGE, LintrapError};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Exit status when lints with a failing severity were reported.
const EXIT_LINTS_FAILED: u8 = 2;

const DEFAULT_CONFIG: &str = include_str!("../config/default.yaml");

fn main() -> ExitCode {
    let (cli, matches) = match parse_args() {
        Ok(parsed) => parsed,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli, &matches) {
        Ok(true) => ExitCode::from(EXIT_LINTS_FAILED),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            let status = e.exit_status();
            eprintln!("{:?}", miette::Report::new(e));
            if status == EXIT_SOFTWARE {
                eprintln!(
                    "This is a bug. Please report it at {}",
                    env!("CARGO_PKG_REPOSITORY")
                );
            }
            ExitCode::from(status)
        }
    }
}

fn parse_args() -> Result<(Cli, ArgMatches), clap::Error> {
    let matches = Cli::command().try_get_matches()?;
    let cli = Cli::from_arg_matches(&matches)?;
    Ok((cli, matches))
}

fn run(cli: &Cli, matches: &ArgMatches) -> Result<bool, LintrapError> {
    let mut app = build_application()?;

    if cli.show_formatters {
        commands::show::show_formatters(&app);
        return Ok(false);
    }
    if cli.show_linters {
        commands::show::show_linters(&mut app, cli)?;
        return Ok(false);
    }
    if let Some(linter) = &cli.show_docs {
        commands::show::show_docs(&mut app, cli, linter.as_deref())?;
        return Ok(false);
    }

    commands::scan::run_scan(&mut app, cli, matches)
}

fn build_application() -> Result<Application, LintrapError> {
    let builder = Application::builder()
        .name("Lintrap")
        .executable_name(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .configuration_file_names([
            ".lintrap.yaml",
            ".lintrap.yml",
            ".lintrap.json",
            ".lintrap.jsonc",
        ])
        .file_extensions(["txt"])
        .base_configuration(Configuration::from_yaml(DEFAULT_CONFIG)?)
        .home_url(env!("CARGO_PKG_REPOSITORY"))
        .issues_url(concat!(env!("CARGO_PKG_REPOSITORY"), "/issues"));

    linters::descriptors()?
        .into_iter()
        .fold(builder, |builder, descriptor| builder.linter(descriptor))
        .build()
}
