//! Documents and document parsers.
//!
//! A [`Document`] is the unit linters operate on: the (possibly
//! preprocessed) source of one file plus whatever parsed representation the
//! application's [`DocumentParser`] produced for it.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::error::ParseError;

/// Parsed representation of a document, owned by the document.
pub type ParsedSource = Box<dyn Any + Send + Sync>;

/// Converts source text into an application-specific representation.
///
/// A parser runs once per document before any linter sees it. Parse failures
/// are reported as lints against the document instead of aborting the run.
pub trait DocumentParser: Send + Sync {
    /// Name of the document type, used in log messages.
    fn name(&self) -> &str;

    /// Parses `source`.
    ///
    /// Returning `Ok(None)` means the document has no structured
    /// representation and linters work on its lines alone.
    fn parse(
        &self,
        source: &str,
        config: &Configuration,
    ) -> Result<Option<ParsedSource>, ParseError>;
}

/// Parser for documents that are treated as plain lines of text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn name(&self) -> &str {
        "text"
    }

    fn parse(
        &self,
        _source: &str,
        _config: &Configuration,
    ) -> Result<Option<ParsedSource>, ParseError> {
        Ok(None)
    }
}

/// A parsed document.
pub struct Document {
    source: String,
    source_lines: Vec<String>,
    path: Option<PathBuf>,
    parsed: Option<ParsedSource>,
}

impl Document {
    /// Parses `source` with `parser`.
    ///
    /// Any error returned by the parser is annotated with `path`.
    pub fn parse(
        source: impl Into<String>,
        config: &Configuration,
        path: Option<PathBuf>,
        parser: &dyn DocumentParser,
    ) -> Result<Self, ParseError> {
        let source = source.into();
        let parsed = match parser.parse(&source, config) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(match &path {
                    Some(path) if err.path.is_none() => err.with_path(path),
                    _ => err,
                });
            }
        };

        Ok(Self {
            source_lines: split_lines(&source),
            source,
            path,
            parsed,
        })
    }

    /// Creates a document without a parsed representation.
    pub fn from_source(source: impl Into<String>, path: Option<PathBuf>) -> Self {
        let source = source.into();
        Self {
            source_lines: split_lines(&source),
            source,
            path,
            parsed: None,
        }
    }

    /// Full source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source split into lines, without line terminators.
    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    /// Path of the file the document was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the parsed representation if it is a `T`.
    pub fn parsed<T: Any>(&self) -> Option<&T> {
        self.parsed.as_ref().and_then(|parsed| parsed.downcast_ref())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("lines", &self.source_lines.len())
            .field("parsed", &self.parsed.is_some())
            .finish()
    }
}

fn split_lines(source: &str) -> Vec<String> {
    source.lines().map(str::to_string).collect()
}
