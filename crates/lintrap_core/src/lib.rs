//! # lintrap_core
//!
//! Lint execution engine for Lintrap.
//!
//! This crate provides:
//! - Configuration loading, `extends` resolution and linter plugins
//! - File discovery and filtering
//! - Linter selection and option validation
//! - Sequential and parallel job execution with failure isolation
//! - Reports and the built-in formatters
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintrap_core::{Application, RunOptions, Runner};
//!
//! let mut app = Application::builder()
//!     .name("Lintrap")
//!     .executable_name("lintrap")
//!     .version("0.1.0")
//!     .configuration_file_names([".lintrap.yaml"])
//!     .file_extensions(["txt"])
//!     .linter(line_length_descriptor()?)
//!     .build()?;
//!
//! let options = RunOptions::default();
//! let config = app.load_configuration(&options)?;
//! let formatter = app.load_formatters(&[], &config, false)?;
//! let report = Runner::new(&app, &config, &formatter).run(&options)?;
//! std::process::exit(if report.has_failures() { 2 } else { 0 });
//! ```

mod application;
mod config;
mod document;
mod document_loader;
mod error;
pub mod file_finder;
pub mod formatters;
mod lint;
pub mod linter;
mod location;
mod options;
mod plugin;
mod preprocessor;
mod report;
mod resolver;
mod runner;
mod selector;
mod severity;

pub use application::{Application, ApplicationBuilder};
pub use config::{Configuration, EXTENDS_KEY, LINTER_PLUGINS_KEY};
pub use document::{Document, DocumentParser, ParsedSource, PlainTextParser};
pub use document_loader::{DocumentLoader, LoadedDocuments};
pub use error::{
    EXIT_CONFIG, EXIT_PREPROCESSOR, EXIT_SOFTWARE, EXIT_USAGE, LintrapError, ParseError,
};
pub use file_finder::{FileFinder, FindOptions};
pub use formatters::{
    DEFAULT_FORMATTER, Destination, Formatter, FormatterForwarder, FormatterLoader,
};
pub use lint::{Lint, LintException, sort_lints};
pub use linter::{
    BoxError, Linter, LinterConfig, LinterDescriptor, LinterRegistry, OptionSpec, OptionType,
    ScanContext,
};
pub use location::{Location, SourceRange};
pub use options::{Concurrency, RunOptions, StdinInput};
pub use plugin::{LinterPlugin, PluginRegistry};
pub use preprocessor::{FileToLint, Preprocessor};
pub use report::{FAIL_ACTION, Report, SeverityTable, WARN_ACTION};
pub use resolver::ConfigurationResolver;
pub use runner::{Job, JobFailure, Runner};
pub use selector::LinterSelector;
pub use severity::Severity;

#[cfg(test)]
pub(crate) mod test_utils;
