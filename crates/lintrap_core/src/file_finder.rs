//! File discovery.
//!
//! Expands included paths and glob patterns into the list of files to lint
//! and removes everything matched by the excluded paths and patterns.

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::LintrapError;

/// Search criteria for [`FileFinder::find`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Files and directories to lint. Directories are searched recursively.
    pub included_paths: Vec<String>,
    /// Files and directories to skip.
    pub excluded_paths: Vec<String>,
    /// Glob patterns of files to lint. Each must match something.
    pub included_patterns: Vec<String>,
    /// Glob patterns of files to skip.
    pub excluded_patterns: Vec<String>,
    /// Extensions (without the dot) of files picked up from directories.
    pub allowed_extensions: Vec<String>,
}

/// Finds the files a run should lint.
pub struct FileFinder {
    options: FindOptions,
}

impl FileFinder {
    pub fn new(options: FindOptions) -> Self {
        Self { options }
    }

    /// Returns the matching files in lexicographic order without duplicates.
    ///
    /// Explicitly included files are kept whatever their extension. Missing
    /// included or excluded paths are [`LintrapError::InvalidFilePath`]
    /// errors and an included pattern matching nothing is an
    /// [`LintrapError::InvalidFilePattern`] error.
    pub fn find(&self) -> Result<Vec<PathBuf>, LintrapError> {
        let extensions: Vec<&str> = self
            .options
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.'))
            .collect();

        let mut candidates = BTreeSet::new();
        for path in &self.options.included_paths {
            candidates.extend(find_in_path(&normalize(Path::new(path)), &extensions)?);
        }
        for pattern in &self.options.included_patterns {
            candidates.extend(find_matching_files(pattern)?);
        }

        let excluded_paths = self
            .options
            .excluded_paths
            .iter()
            .map(|path| {
                let path = normalize(Path::new(path));
                if path.exists() {
                    Ok(path)
                } else {
                    Err(LintrapError::file_path(format!(
                        "Excluded path '{}' does not correspond to a valid file",
                        path.display()
                    )))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let excluded_globs = build_globset(&self.options.excluded_patterns)?;

        let files: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|file| {
                let excluded = excluded_paths.iter().any(|excluded| file.starts_with(excluded))
                    || excluded_globs
                        .as_ref()
                        .is_some_and(|globs| glob_matches(globs, file));
                if excluded {
                    debug!("Excluding {}", file.display());
                }
                !excluded
            })
            .collect();

        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }
}

/// Compiles `patterns` into a set where `*` does not match path separators.
///
/// Returns `None` for an empty pattern list.
pub(crate) fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LintrapError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = normalize(Path::new(pattern));
        let glob = GlobBuilder::new(&normalized.to_string_lossy())
            .literal_separator(true)
            .build()
            .map_err(|e| {
                LintrapError::file_pattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        builder.add(glob);
    }

    let globset = builder
        .build()
        .map_err(|e| LintrapError::file_pattern(format!("Failed to build globset: {}", e)))?;

    Ok(Some(globset))
}

/// Whether any glob in `globs` matches `path`, either as given or relative to
/// the current working directory.
pub(crate) fn glob_matches(globs: &GlobSet, path: &Path) -> bool {
    match env::current_dir() {
        Ok(working_directory) => glob_matches_from(globs, path, &working_directory),
        Err(_) => globs.is_match(normalize(path)),
    }
}

fn glob_matches_from(globs: &GlobSet, path: &Path, working_directory: &Path) -> bool {
    let path = normalize(path);
    if globs.is_match(&path) {
        return true;
    }
    if path.is_absolute() {
        path.strip_prefix(working_directory)
            .is_ok_and(|relative| globs.is_match(relative))
    } else {
        globs.is_match(working_directory.join(&path))
    }
}

/// Strips leading `./` components.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    match path.strip_prefix(".") {
        Ok(rest) if !rest.as_os_str().is_empty() => normalize(rest),
        _ => path.to_path_buf(),
    }
}

fn find_in_path(path: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, LintrapError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(LintrapError::file_path(format!(
            "Path '{}' does not correspond to a valid file or directory",
            path.display()
        )));
    }

    let files = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.contains(&ext))
        })
        .map(|entry| normalize(entry.path()))
        .collect();

    Ok(files)
}

fn find_matching_files(pattern: &str) -> Result<Vec<PathBuf>, LintrapError> {
    let globs = build_globset(&[pattern.to_string()])?;
    let Some(globs) = globs else {
        return Ok(Vec::new());
    };

    let base = literal_prefix(&normalize(Path::new(pattern)));
    let walk_root = if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base
    };

    let mut matched_any = false;
    let mut files = Vec::new();
    for entry in WalkDir::new(&walk_root).into_iter().filter_map(|e| e.ok()) {
        let path = normalize(entry.path());
        if !globs.is_match(&path) {
            continue;
        }
        matched_any = true;
        if entry.file_type().is_file() {
            files.push(path);
        }
    }

    if !matched_any {
        return Err(LintrapError::file_pattern(format!(
            "Glob pattern '{}' does not match any file",
            pattern
        )));
    }

    Ok(files)
}

/// Leading components of `pattern` that contain no glob metacharacters.
fn literal_prefix(pattern: &Path) -> PathBuf {
    pattern
        .components()
        .take_while(|component| {
            !component
                .as_os_str()
                .to_string_lossy()
                .contains(['*', '?', '[', '{'])
        })
        .collect()
}
