//! Report formatters.
//!
//! Formatters are notified as a run progresses. Job callbacks may arrive
//! concurrently from worker threads, so formatters take `&self` and guard
//! their output with a mutex.

mod checkstyle;
mod default;
mod json;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::LintrapError;
use crate::lint::Lint;
use crate::report::{Report, SeverityTable};
use crate::runner::Job;

pub use checkstyle::CheckstyleFormatter;
pub use default::DefaultFormatter;
pub use json::JsonFormatter;

/// Receives progress notifications during a run.
pub trait Formatter: Send + Sync {
    /// Called once the files to lint are known.
    fn started(&self, _files: &[PathBuf]) {}

    /// Called before a linter runs against a file. May be called in parallel.
    fn job_started(&self, _job: &Job) {}

    /// Called after a linter ran against a file. May be called in parallel.
    fn job_finished(&self, _job: &Job, _lints: &[Lint]) {}

    /// Called at the end of the run.
    fn finished(&self, _report: &Report) {}
}

/// Fans every notification out to a list of formatters, in order.
#[derive(Default)]
pub struct FormatterForwarder {
    formatters: Vec<Box<dyn Formatter>>,
}

impl FormatterForwarder {
    pub fn new(formatters: Vec<Box<dyn Formatter>>) -> Self {
        Self { formatters }
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl Formatter for FormatterForwarder {
    fn started(&self, files: &[PathBuf]) {
        for formatter in &self.formatters {
            formatter.started(files);
        }
    }

    fn job_started(&self, job: &Job) {
        for formatter in &self.formatters {
            formatter.job_started(job);
        }
    }

    fn job_finished(&self, job: &Job, lints: &[Lint]) {
        for formatter in &self.formatters {
            formatter.job_finished(job, lints);
        }
    }

    fn finished(&self, report: &Report) {
        for formatter in &self.formatters {
            formatter.finished(report);
        }
    }
}

/// Where a formatter writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// Shared, lock-protected output stream.
pub struct OutputStream {
    inner: Mutex<Box<dyn Write + Send>>,
}

impl OutputStream {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Writes `text`, logging (rather than returning) any I/O error.
    pub fn write(&self, text: &str) {
        let mut out = self.inner.lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!("Failed to write formatter output: {}", e);
        }
    }
}

/// Settings shared by every formatter of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterContext {
    /// Name of the application, for report metadata.
    pub application_name: String,
    /// Version of the application, for report metadata.
    pub version: String,
    /// Decides which lints count as failures and warnings.
    pub severities: SeverityTable,
    /// Whether to show details of errors raised by linters.
    pub debug: bool,
}

/// Creates a formatter writing to an output stream.
pub type FormatterConstructor =
    Arc<dyn Fn(&FormatterContext, OutputStream) -> Box<dyn Formatter> + Send + Sync>;

/// Name used when no formatter is requested.
pub const DEFAULT_FORMATTER: &str = "Default";

/// Maps formatter names to constructors.
#[derive(Clone)]
pub struct FormatterLoader {
    formatters: Vec<(String, FormatterConstructor)>,
}

impl FormatterLoader {
    /// Creates a loader that knows the built-in formatters.
    pub fn new() -> Self {
        let mut loader = Self {
            formatters: Vec::new(),
        };
        loader.register(DEFAULT_FORMATTER, |context, output| {
            Box::new(DefaultFormatter::new(context.clone(), output))
        });
        loader.register("Json", |context, output| {
            Box::new(JsonFormatter::new(context.clone(), output))
        });
        loader.register("Checkstyle", |_, output| {
            Box::new(CheckstyleFormatter::new(output))
        });
        loader
    }

    /// Adds or replaces a formatter.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&FormatterContext, OutputStream) -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        let name = name.into();
        self.formatters
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.formatters.push((name, Arc::new(constructor)));
    }

    /// Names of all known formatters, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Instantiates the requested formatters.
    ///
    /// Names are matched case-insensitively. An empty request yields the
    /// default formatter writing to standard output.
    pub fn load(
        &self,
        requested: &[(String, Destination)],
        context: &FormatterContext,
    ) -> Result<FormatterForwarder, LintrapError> {
        let default = [(DEFAULT_FORMATTER.to_string(), Destination::Stdout)];
        let requested = if requested.is_empty() {
            &default[..]
        } else {
            requested
        };

        let formatters = requested
            .iter()
            .map(|(name, destination)| {
                let constructor = self.constructor(name)?;
                let output = match destination {
                    Destination::Stdout => OutputStream::stdout(),
                    Destination::File(path) => open_destination(name, path)?,
                };
                Ok(constructor(context, output))
            })
            .collect::<Result<Vec<_>, LintrapError>>()?;

        Ok(FormatterForwarder::new(formatters))
    }

    fn constructor(&self, name: &str) -> Result<&FormatterConstructor, LintrapError> {
        self.formatters
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, constructor)| constructor)
            .ok_or_else(|| {
                LintrapError::FormatterLoad(format!(
                    "Unable to load formatter `{}`: available formatters are {}",
                    name,
                    self.names().join(", ")
                ))
            })
    }
}

impl Default for FormatterLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn open_destination(name: &str, path: &Path) -> Result<OutputStream, LintrapError> {
    File::create(path).map(OutputStream::new).map_err(|e| {
        LintrapError::FormatterLoad(format!(
            "Unable to create output file '{}' for formatter `{}`: {}",
            path.display(),
            name,
            e
        ))
    })
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}
