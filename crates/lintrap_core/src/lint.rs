//! Lint records.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::location::{Location, SourceRange};
use crate::severity::Severity;

/// Error captured when a lint was produced by a crashing linter.
pub type LintException = Arc<dyn Error + Send + Sync + 'static>;

/// A problem detected in a document.
#[derive(Debug, Clone)]
pub struct Lint {
    /// Canonical name of the linter that reported the lint, if any.
    pub linter: Option<String>,
    /// File the lint applies to.
    pub path: PathBuf,
    /// Source range of the problem.
    pub source_range: SourceRange,
    /// Message describing the problem.
    pub message: String,
    /// Severity of the lint.
    pub severity: Severity,
    /// Error raised while linting, when the lint stands in for a crash.
    pub exception: Option<LintException>,
}

impl Lint {
    /// Creates a new lint without a linter reference.
    pub fn new(
        path: impl Into<PathBuf>,
        source_range: SourceRange,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            linter: None,
            path: path.into(),
            source_range,
            message: message.into(),
            severity,
            exception: None,
        }
    }

    /// Sets the reporting linter.
    pub fn with_linter(mut self, linter: impl Into<String>) -> Self {
        self.linter = Some(linter.into());
        self
    }

    /// Attaches the error that caused this lint.
    pub fn with_exception(mut self, exception: LintException) -> Self {
        self.exception = Some(exception);
        self
    }

    /// First position of the lint.
    pub fn location(&self) -> Location {
        self.source_range.begin
    }

    /// Returns the path the lint applies to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sorts lints into canonical report order: by path, then by start line.
///
/// The sort is stable so lints on the same line keep the order they were
/// reported in.
pub fn sort_lints(lints: &mut [Lint]) {
    lints.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(a.source_range.begin.line.cmp(&b.source_range.begin.line))
    });
}
