//! Command implementations

pub mod scan;
pub mod show;

use std::io;

use lintrap_core::{LintrapError, RunOptions, StdinInput};

use crate::cli::Cli;

/// Translates parsed arguments into options for a run.
///
/// Reads standard input when `--stdin-file-path` is given.
pub fn run_options(cli: &Cli) -> Result<RunOptions, LintrapError> {
    let stdin = match &cli.stdin_file_path {
        Some(path) => Some(StdinInput {
            path: path.clone(),
            content: io::read_to_string(io::stdin())?,
        }),
        None => None,
    };

    Ok(RunOptions {
        included_paths: cli.paths.iter().map(|p| p.display().to_string()).collect(),
        excluded_paths: cli.exclude_paths.clone(),
        included_linters: cli.include_linters.clone(),
        excluded_linters: cli.exclude_linters.clone(),
        linter_plugins: cli.plugins.clone(),
        config_file: cli.config.clone(),
        concurrency: cli.concurrency,
        stdin,
        debug: cli.debug,
    })
}
