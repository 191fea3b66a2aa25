//! Options controlling a single run.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;

use crate::error::LintrapError;

/// Number of worker threads used to execute jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    /// A fixed number of workers.
    Workers(NonZeroUsize),
    /// One worker per available processor.
    Auto,
}

impl Concurrency {
    /// Resolves the number of worker threads to start.
    pub fn worker_count(&self) -> usize {
        match self {
            Concurrency::Workers(n) => n.get(),
            Concurrency::Auto => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }
}

impl FromStr for Concurrency {
    type Err = LintrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Concurrency::Auto);
        }
        s.parse::<NonZeroUsize>()
            .map(Concurrency::Workers)
            .map_err(|_| {
                LintrapError::InvalidCliOption(format!(
                    "Invalid concurrency '{}': expected a positive number or 'auto'",
                    s
                ))
            })
    }
}

/// Content to lint read from standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdinInput {
    /// Path the content is reported and filtered as.
    pub path: PathBuf,
    pub content: String,
}

/// Options for [`crate::Runner::run`] and
/// [`crate::Application::load_configuration`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Files and directories to lint. Falls back to the configured
    /// `included_paths` when empty.
    pub included_paths: Vec<String>,
    /// Files and directories to skip, in addition to the configured ones.
    pub excluded_paths: Vec<String>,
    /// Linters to run regardless of whether they are enabled.
    pub included_linters: Vec<String>,
    /// Linters never to run.
    pub excluded_linters: Vec<String>,
    /// Plugins to activate in addition to the configured ones.
    pub linter_plugins: Vec<String>,
    /// Configuration file to use instead of searching for one.
    pub config_file: Option<PathBuf>,
    /// Runs jobs in parallel when set.
    pub concurrency: Option<Concurrency>,
    /// Lints standard input instead of searching for files.
    pub stdin: Option<StdinInput>,
    /// Shows details of errors raised by linters.
    pub debug: bool,
}
