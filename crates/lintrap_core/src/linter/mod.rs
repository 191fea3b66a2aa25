//! Linters.
//!
//! A linter is constructed from a validated [`LinterConfig`] for every
//! document it runs on, so implementations may keep per-document state in
//! `self` without synchronization.

mod options;
mod registry;

use std::error::Error;
use std::path::PathBuf;

use crate::document::Document;
use crate::lint::Lint;
use crate::location::{Location, SourceRange};

pub use options::{BUILT_IN_OPTIONS, LinterConfig, OptionSchema, OptionSpec, OptionType};
pub use registry::{
    LinterDescriptor, LinterDescriptorBuilder, LinterFactory, LinterRegistry, canonical_name_of,
};

/// Error type linters may return from [`Linter::scan`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Checks a single document.
pub trait Linter: Send {
    /// Scans the document in `ctx`, reporting problems with
    /// [`ScanContext::report_lint`].
    ///
    /// Returning an error (or panicking) does not abort the run; the runner
    /// reports a single lint describing the failure instead.
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError>;
}

/// What a linter sees while scanning a document.
pub struct ScanContext<'a> {
    document: &'a Document,
    config: &'a LinterConfig,
    linter_name: &'a str,
    lints: &'a mut Vec<Lint>,
}

impl<'a> ScanContext<'a> {
    /// The document being scanned.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Configuration of the running linter.
    pub fn config(&self) -> &'a LinterConfig {
        self.config
    }

    /// Records a lint at `range` with the linter's configured severity.
    pub fn report_lint(&mut self, range: SourceRange, message: impl Into<String>) {
        let path = self
            .document
            .path()
            .map(PathBuf::from)
            .unwrap_or_default();
        let lint = Lint::new(path, range, message, self.config.severity().clone())
            .with_linter(self.linter_name);
        self.lints.push(lint);
    }

    /// Records a lint at a single position.
    pub fn report_at(&mut self, line: u32, column: u32, message: impl Into<String>) {
        self.report_lint(SourceRange::at(line, column), message);
    }

    /// Records a lint spanning `begin` to `end`.
    pub fn report_between(&mut self, begin: Location, end: Location, message: impl Into<String>) {
        self.report_lint(SourceRange::new(begin, end), message);
    }
}

/// A configured linter ready to run against documents.
pub struct LinterInstance {
    name: String,
    config: LinterConfig,
    linter: Box<dyn Linter>,
    lints: Vec<Lint>,
}

impl LinterInstance {
    pub fn new(name: impl Into<String>, config: LinterConfig, linter: Box<dyn Linter>) -> Self {
        Self {
            name: name.into(),
            config,
            linter,
            lints: Vec::new(),
        }
    }

    /// Canonical name of the linter.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// Runs the linter against `document`, returning the lints it reported.
    ///
    /// Lints from an earlier run are discarded first.
    pub fn run(&mut self, document: &Document) -> Result<Vec<Lint>, BoxError> {
        self.lints.clear();
        let mut ctx = ScanContext {
            document,
            config: &self.config,
            linter_name: &self.name,
            lints: &mut self.lints,
        };
        self.linter.scan(&mut ctx)?;
        Ok(std::mem::take(&mut self.lints))
    }
}

impl std::fmt::Debug for LinterInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinterInstance")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish()
    }
}
