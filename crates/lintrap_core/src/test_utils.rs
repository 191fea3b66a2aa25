//! Helpers shared by unit tests.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Map;
use tempfile::TempDir;

use crate::application::Application;
use crate::formatters::FormatterContext;
use crate::linter::{
    BoxError, Linter, LinterDescriptor, LinterInstance, OptionSchema, ScanContext,
};
use crate::report::SeverityTable;

/// In-memory writer whose contents stay readable after it is handed out.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) fn formatter_context() -> FormatterContext {
    FormatterContext {
        application_name: "lintrap".to_string(),
        version: "1.2.3".to_string(),
        severities: SeverityTable::default(),
        debug: false,
    }
}

/// What a [`ScriptedLinter`] does when it scans a document.
#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    /// One lint at column 1 of every line.
    ReportEachLine,
    /// A single lint at 1:1.
    ReportFirstLine,
    Fail(&'static str),
    Panic(&'static str),
    Sleep(Duration),
}

pub(crate) struct ScriptedLinter(pub(crate) Behavior);

impl Linter for ScriptedLinter {
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        match &self.0 {
            Behavior::ReportEachLine => {
                let count = ctx.document().source_lines().len();
                for line in 1..=count {
                    ctx.report_at(line as u32, 1, format!("Line {}", line));
                }
            }
            Behavior::ReportFirstLine => ctx.report_at(1, 1, "First line"),
            Behavior::Fail(message) => return Err((*message).into()),
            Behavior::Panic(message) => panic!("{}", message),
            Behavior::Sleep(duration) => thread::sleep(*duration),
        }
        Ok(())
    }
}

/// An instance with every built-in option at its default.
pub(crate) fn instance(name: &str, linter: impl Linter + 'static) -> LinterInstance {
    let config = OptionSchema::new().validate(name, &Map::new()).unwrap();
    LinterInstance::new(name, config, Box::new(linter))
}

pub(crate) fn scripted(name: &str, behavior: Behavior) -> LinterDescriptor {
    LinterDescriptor::builder(name)
        .description("Scripted test linter")
        .build(move |_| Ok(Box::new(ScriptedLinter(behavior.clone())) as Box<dyn Linter>))
        .unwrap()
}

/// A minimal application linting `.txt` files with the given linters.
pub(crate) fn application_with(linters: Vec<LinterDescriptor>) -> Application {
    linters
        .into_iter()
        .fold(
            Application::builder()
                .name("Lintrap")
                .executable_name("lintrap")
                .version("1.2.3")
                .configuration_file_names([".lintrap.yaml"])
                .file_extensions(["txt"]),
            |builder, linter| builder.linter(linter),
        )
        .build()
        .unwrap()
}

/// Writes `files` into a fresh temporary directory, returning their paths.
pub(crate) fn write_files(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().unwrap();
    let paths = files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        })
        .collect();
    (dir, paths)
}
