//! Pipes file contents through an external command before parsing.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use globset::GlobSet;
use tracing::debug;

use crate::config::Configuration;
use crate::error::LintrapError;
use crate::file_finder::{build_globset, glob_matches};

/// A file queued for linting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToLint {
    pub path: PathBuf,
    pub content: String,
}

/// Runs the configured `preprocess_command` over matching files.
pub struct Preprocessor {
    command: Option<String>,
    files: Option<GlobSet>,
}

impl Preprocessor {
    /// Reads `preprocess_command` and `preprocess_files` from `config`.
    pub fn new(config: &Configuration) -> Result<Self, LintrapError> {
        let command = config.get_str("preprocess_command").map(str::to_string);
        let files = build_globset(&config.string_list("preprocess_files")?)?;
        Ok(Self { command, files })
    }

    /// Replaces the content of every matching file with the command's output.
    ///
    /// Files are untouched when no command is configured. A command that
    /// exits unsuccessfully is a [`LintrapError::Preprocessor`] error.
    pub fn preprocess_files(&self, files: &mut [FileToLint]) -> Result<(), LintrapError> {
        let Some(command) = &self.command else {
            return Ok(());
        };

        for file in files.iter_mut().filter(|file| self.applies_to(file)) {
            debug!("Preprocessing {} with `{}`", file.path.display(), command);
            file.content = run(command, file)?;
        }
        Ok(())
    }

    fn applies_to(&self, file: &FileToLint) -> bool {
        self.files
            .as_ref()
            .is_none_or(|globs| glob_matches(globs, &file.path))
    }
}

fn run(command: &str, file: &FileToLint) -> Result<String, LintrapError> {
    let failure = |reason: String| {
        LintrapError::Preprocessor(format!(
            "Preprocess command `{}` failed when passed the contents of '{}': {}",
            command,
            file.path.display(),
            reason
        ))
    };

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| failure(format!("unable to start command: {}", e)))?;

    // Feed stdin from another thread so a command that writes before it has
    // read everything cannot deadlock against us.
    let writer = child.stdin.take().map(|mut stdin| {
        let content = file.content.clone();
        thread::spawn(move || stdin.write_all(content.as_bytes()))
    });

    let output = child
        .wait_with_output()
        .map_err(|e| failure(format!("unable to read output: {}", e)))?;

    if let Some(writer) = writer {
        // A command that ignores its input closes the pipe early; only the
        // exit status decides success.
        let _ = writer.join();
    }

    if !output.status.success() {
        let status = output
            .status
            .code()
            .map_or_else(|| "a signal".to_string(), |code| code.to_string());
        return Err(failure(format!("returned an exit status of {}", status)));
    }

    String::from_utf8(output.stdout).map_err(|e| failure(format!("output is not UTF-8: {}", e)))
}
