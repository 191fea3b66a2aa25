//! Loads the documents of a run.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::Application;
use crate::config::Configuration;
use crate::document::Document;
use crate::error::{LintrapError, ParseError};
use crate::file_finder::{FileFinder, FindOptions};
use crate::formatters::Formatter;
use crate::lint::Lint;
use crate::location::SourceRange;
use crate::options::RunOptions;
use crate::preprocessor::{FileToLint, Preprocessor};
use crate::severity::Severity;

/// Documents that loaded, plus one lint for every file that failed to parse.
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    pub documents: Vec<Arc<Document>>,
    pub parse_lints: Vec<Lint>,
}

/// Finds, reads, preprocesses and parses the files to lint.
pub struct DocumentLoader<'a> {
    application: &'a Application,
    config: &'a Configuration,
    formatter: &'a dyn Formatter,
}

impl<'a> DocumentLoader<'a> {
    pub fn new(
        application: &'a Application,
        config: &'a Configuration,
        formatter: &'a dyn Formatter,
    ) -> Self {
        Self {
            application,
            config,
            formatter,
        }
    }

    /// Loads every file selected by `options` and the configuration.
    ///
    /// Parse failures do not abort loading; the file is left out of the
    /// documents and reported through [`LoadedDocuments::parse_lints`].
    pub fn load(&self, options: &RunOptions) -> Result<LoadedDocuments, LintrapError> {
        let (mut files, undecodable) = self.files_to_lint(options)?;
        Preprocessor::new(self.config)?.preprocess_files(&mut files)?;

        let mut paths: Vec<PathBuf> = files
            .iter()
            .map(|file| file.path.clone())
            .chain(undecodable.iter().map(|(path, _)| path.clone()))
            .collect();
        paths.sort();
        self.formatter.started(&paths);

        let severity = self
            .config
            .severity("parse_exception_severity", Severity::Error);
        let parser = self.application.document_parser();

        let mut loaded = LoadedDocuments::default();
        for (path, err) in undecodable {
            loaded
                .parse_lints
                .push(parse_failure_lint(path, err, &severity));
        }
        for file in files {
            match Document::parse(file.content, self.config, Some(file.path.clone()), parser) {
                Ok(document) => loaded.documents.push(Arc::new(document)),
                Err(err) => {
                    loaded
                        .parse_lints
                        .push(parse_failure_lint(file.path, err, &severity));
                }
            }
        }

        debug!(
            "Loaded {} documents, {} failed to parse",
            loaded.documents.len(),
            loaded.parse_lints.len()
        );
        Ok(loaded)
    }

    /// Reads the files to lint. Files that are not valid UTF-8 come back as
    /// parse errors instead.
    fn files_to_lint(
        &self,
        options: &RunOptions,
    ) -> Result<(Vec<FileToLint>, Vec<(PathBuf, ParseError)>), LintrapError> {
        if let Some(stdin) = &options.stdin {
            let file = FileToLint {
                path: stdin.path.clone(),
                content: stdin.content.clone(),
            };
            return Ok((vec![file], Vec::new()));
        }

        let mut files = Vec::new();
        let mut undecodable = Vec::new();
        for path in FileFinder::new(self.find_options(options)?).find()? {
            let bytes = fs::read(&path).map_err(|e| {
                LintrapError::file_path(format!("Unable to read '{}': {}", path.display(), e))
            })?;
            match String::from_utf8(bytes) {
                Ok(content) => files.push(FileToLint { path, content }),
                Err(e) => {
                    let err = ParseError::new(format!("invalid UTF-8: {}", e.utf8_error()))
                        .at(SourceRange::at(1, 1))
                        .with_path(&path);
                    undecodable.push((path, err));
                }
            }
        }
        Ok((files, undecodable))
    }

    fn find_options(&self, options: &RunOptions) -> Result<FindOptions, LintrapError> {
        let config = self.config;

        let allowed_extensions = if config.contains_key("file_extensions") {
            config.string_list("file_extensions")?
        } else {
            self.application.file_extensions().to_vec()
        };

        let included_paths = if options.included_paths.is_empty() {
            config.string_list("included_paths")?
        } else {
            options.included_paths.clone()
        };

        let mut excluded_paths = config.string_list("excluded_paths")?;
        excluded_paths.extend(options.excluded_paths.iter().cloned());

        let included_patterns = match config.get("include") {
            Some(value) if !value.is_null() => config.string_list("include")?,
            _ if included_paths.is_empty() => allowed_extensions
                .iter()
                .map(|ext| format!("**/*.{}", ext.trim_start_matches('.')))
                .collect(),
            _ => Vec::new(),
        };

        Ok(FindOptions {
            included_paths,
            excluded_paths,
            included_patterns,
            excluded_patterns: config.string_list("exclude")?,
            allowed_extensions,
        })
    }
}

fn parse_failure_lint(path: PathBuf, err: ParseError, severity: &Severity) -> Lint {
    warn!("Failed to parse {}: {}", path.display(), err);
    let range = err.source_range.unwrap_or_else(|| SourceRange::at(1, 1));
    let message = format!(
        "Error occurred while parsing {}: {}",
        path.display(),
        err.message
    );
    Lint::new(path, range, message, severity.clone()).with_exception(Arc::new(err))
}
