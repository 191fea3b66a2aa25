//! Lintrap error types.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::location::SourceRange;

/// Exit status for configuration problems (`EX_CONFIG`).
pub const EXIT_CONFIG: u8 = 78;
/// Exit status for usage problems (`EX_USAGE`).
pub const EXIT_USAGE: u8 = 64;
/// Exit status for unexpected internal errors (`EX_SOFTWARE`).
pub const EXIT_SOFTWARE: u8 = 70;
/// Exit status for preprocessor failures.
pub const EXIT_PREPROCESSOR: u8 = 84;

/// Errors that abort a lint run.
///
/// Linter crashes and document parse failures are never reported through this
/// type; the runner converts them into lints instead.
#[derive(Debug, Error, Diagnostic)]
pub enum LintrapError {
    /// The application description is missing a required attribute.
    #[error("Application configuration error: {0}")]
    #[diagnostic(code(lintrap::application))]
    ApplicationConfiguration(String),

    /// A configuration file could not be parsed.
    #[error("Unable to parse configuration from '{}': {message}", .path.display())]
    #[diagnostic(code(lintrap::config::parse))]
    ConfigurationParse { path: PathBuf, message: String },

    /// A configuration file was not found.
    #[error("{0}")]
    #[diagnostic(code(lintrap::config::not_found))]
    NoConfigurationFile(String),

    /// A configuration extends itself, directly or transitively.
    #[error("Configuration extends itself: {}", format_chain(.0))]
    #[diagnostic(
        code(lintrap::config::extends_cycle),
        help("remove one of the `extends` entries to break the cycle")
    )]
    ExtendsCycle(Vec<PathBuf>),

    /// A linter's configuration does not match its option schema.
    #[error("{0}")]
    #[diagnostic(code(lintrap::config::linter))]
    LinterConfiguration(String),

    /// A linter declared an invalid option schema.
    #[error("{0}")]
    #[diagnostic(code(lintrap::config::option_spec))]
    InvalidOptionSpecification(String),

    /// A linter plugin could not be loaded.
    #[error("{0}")]
    #[diagnostic(code(lintrap::config::plugin))]
    LinterLoad(String),

    /// The run would not execute any linter.
    #[error("{0}")]
    #[diagnostic(code(lintrap::config::no_linters))]
    NoLinters(String),

    /// A linter name does not correspond to any registered linter.
    #[error("Linter {0} does not exist! Are you sure you spelt it correctly?")]
    #[diagnostic(code(lintrap::usage::no_such_linter))]
    NoSuchLinter(String),

    /// An included or excluded path does not exist.
    #[error("{0}")]
    #[diagnostic(code(lintrap::usage::path))]
    InvalidFilePath(String),

    /// An included glob pattern is invalid or matches nothing.
    #[error("{0}")]
    #[diagnostic(code(lintrap::usage::pattern))]
    InvalidFilePattern(String),

    /// A formatter could not be loaded.
    #[error("{0}")]
    #[diagnostic(code(lintrap::usage::formatter))]
    FormatterLoad(String),

    /// Invalid or incompatible command line options.
    #[error("{0}")]
    #[diagnostic(code(lintrap::usage::cli))]
    InvalidCliOption(String),

    /// The external preprocessor command failed.
    #[error("{0}")]
    #[diagnostic(code(lintrap::preprocessor))]
    Preprocessor(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(lintrap::io))]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    #[diagnostic(code(lintrap::internal))]
    Internal(String),
}

impl LintrapError {
    /// Creates a linter configuration error.
    pub fn linter_config(message: impl Into<String>) -> Self {
        Self::LinterConfiguration(message.into())
    }

    /// Creates an invalid file path error.
    pub fn file_path(message: impl Into<String>) -> Self {
        Self::InvalidFilePath(message.into())
    }

    /// Creates an invalid file pattern error.
    pub fn file_pattern(message: impl Into<String>) -> Self {
        Self::InvalidFilePattern(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The process exit status a CLI should use when this error goes unhandled.
    ///
    /// Values follow `sysexits.h` where one applies.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::ApplicationConfiguration(_)
            | Self::ConfigurationParse { .. }
            | Self::NoConfigurationFile(_)
            | Self::ExtendsCycle(_)
            | Self::LinterConfiguration(_)
            | Self::InvalidOptionSpecification(_)
            | Self::LinterLoad(_)
            | Self::NoLinters(_) => EXIT_CONFIG,
            Self::NoSuchLinter(_)
            | Self::InvalidFilePath(_)
            | Self::InvalidFilePattern(_)
            | Self::FormatterLoad(_)
            | Self::InvalidCliOption(_) => EXIT_USAGE,
            Self::Preprocessor(_) => EXIT_PREPROCESSOR,
            Self::Io(_) | Self::Internal(_) => EXIT_SOFTWARE,
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A document could not be parsed.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Path of the document, if it came from a file.
    pub path: Option<PathBuf>,
    /// Where the problem is, if known.
    pub source_range: Option<SourceRange>,
}

impl ParseError {
    /// Creates a parse error without location information.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            source_range: None,
        }
    }

    /// Attaches the source range of the problem.
    pub fn at(mut self, source_range: SourceRange) -> Self {
        self.source_range = Some(source_range);
        self
    }

    /// Attaches the document path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(range) = self.source_range {
            write!(
                f,
                " on line {}, column {}",
                range.begin.line, range.begin.column
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use rstest::rstest;

    #[rstest]
    #[case::config(LintrapError::NoLinters("none".into()), 78)]
    #[case::cycle(LintrapError::ExtendsCycle(vec![]), 78)]
    #[case::usage(LintrapError::file_path("missing"), 64)]
    #[case::no_such_linter(LintrapError::NoSuchLinter("Nope".into()), 64)]
    #[case::preprocessor(LintrapError::Preprocessor("failed".into()), 84)]
    #[case::internal(LintrapError::internal("boom"), 70)]
    fn test_exit_status(#[case] error: LintrapError, #[case] expected: u8) {
        assert_eq!(error.exit_status(), expected);
    }

    #[test]
    fn test_extends_cycle_message_lists_chain() {
        let err = LintrapError::ExtendsCycle(vec![
            PathBuf::from("a.yaml"),
            PathBuf::from("b.yaml"),
            PathBuf::from("a.yaml"),
        ]);
        assert_eq!(
            err.to_string(),
            "Configuration extends itself: a.yaml -> b.yaml -> a.yaml"
        );
    }

    #[test]
    fn test_parse_error_message_includes_location() {
        let loc = Location::new(3, 7);
        let err = ParseError::new("Unexpected token").at(SourceRange::new(loc, loc));
        assert_eq!(err.to_string(), "Unexpected token on line 3, column 7");
    }

    #[test]
    fn test_parse_error_message_without_location() {
        let err = ParseError::new("Unexpected end of input");
        assert_eq!(err.to_string(), "Unexpected end of input");
    }
}
