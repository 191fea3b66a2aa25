//! Glob patterns relative to the working directory
//!
//! Lives in its own test binary because it changes the process working
//! directory.

use std::env;
use std::fs;

use lintrap_core::{
    Application, BoxError, Configuration, FormatterForwarder, Linter, LinterDescriptor,
    RunOptions, Runner, ScanContext,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

struct Flag;

impl Linter for Flag {
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        ctx.report_at(1, 1, "flagged");
        Ok(())
    }
}

fn flag(name: &str) -> LinterDescriptor {
    LinterDescriptor::builder(name)
        .build(|_| Ok(Box::new(Flag) as Box<dyn Linter>))
        .unwrap()
}

#[test]
fn linter_include_patterns_match_absolute_paths_relative_to_working_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("a.txt"), "text\n").unwrap();
    fs::write(root.join("b.md"), "markdown\n").unwrap();

    let app = Application::builder()
        .name("Lintrap")
        .executable_name("lintrap")
        .version("0.0.0")
        .configuration_file_names([".lintrap.yaml"])
        .file_extensions(["txt", "md"])
        .linter(flag("Constrained"))
        .linter(flag("Everywhere"))
        .build()
        .unwrap();
    let config = Configuration::from_value(json!({
        "linters": {
            "Constrained": { "enabled": true, "include": ["*.txt"] },
            "Everywhere": { "enabled": true },
        }
    }))
    .unwrap();
    let options = RunOptions {
        included_paths: vec![
            root.join("a.txt").display().to_string(),
            root.join("b.md").display().to_string(),
        ],
        ..Default::default()
    };

    let original = env::current_dir().unwrap();
    env::set_current_dir(&root).unwrap();
    let result = Runner::new(&app, &config, &FormatterForwarder::default()).run(&options);
    env::set_current_dir(original).unwrap();

    let seen: Vec<(String, String)> = result
        .unwrap()
        .lints()
        .iter()
        .map(|lint| {
            (
                lint.path.file_name().unwrap().to_string_lossy().into_owned(),
                lint.linter.clone().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            ("a.txt".to_string(), "Constrained".to_string()),
            ("a.txt".to_string(), "Everywhere".to_string()),
            ("b.md".to_string(), "Everywhere".to_string()),
        ]
    );
}
