//! End-to-end tests of the lint pipeline
//!
//! Exercises configuration resolution, file discovery, linter selection,
//! execution and reporting through the public `lintrap_core` API.

use std::fs;
use std::path::{Path, PathBuf};

use lintrap_core::{
    Application, BoxError, Concurrency, Configuration, FileFinder, FindOptions, Lint, Linter,
    LinterDescriptor, LinterPlugin, LinterRegistry, LinterSelector, LintrapError, Report,
    RunOptions, Runner, ScanContext, Severity, SeverityTable, SourceRange,
};
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

struct Flag;

impl Linter for Flag {
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        ctx.report_at(1, 1, "flagged");
        Ok(())
    }
}

struct EveryLine;

impl Linter for EveryLine {
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        let count = ctx.document().source_lines().len();
        for line in 1..=count {
            ctx.report_at(line as u32, 1, format!("line {}", line));
        }
        Ok(())
    }
}

struct Exploding;

impl Linter for Exploding {
    fn scan(&mut self, _ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        Err("boom".into())
    }
}

fn descriptor(name: &str, make: fn() -> Box<dyn Linter>) -> LinterDescriptor {
    LinterDescriptor::builder(name)
        .build(move |_| Ok(make()))
        .unwrap()
}

fn flag(name: &str) -> LinterDescriptor {
    descriptor(name, || Box::new(Flag))
}

fn application(linters: Vec<LinterDescriptor>) -> Application {
    linters
        .into_iter()
        .fold(
            Application::builder()
                .name("Lintrap")
                .executable_name("lintrap")
                .version("0.0.0")
                .configuration_file_names([".lintrap.yaml"])
                .file_extensions(["txt", "md"]),
            |builder, linter| builder.linter(linter),
        )
        .build()
        .unwrap()
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn config(value: Value) -> Configuration {
    Configuration::from_value(value).unwrap()
}

fn run(app: &Application, config: &Configuration, options: &RunOptions) -> Report {
    let formatter = lintrap_core::FormatterForwarder::default();
    Runner::new(app, config, &formatter).run(options).unwrap()
}

fn include(dir: &TempDir, names: &[&str]) -> RunOptions {
    RunOptions {
        included_paths: names
            .iter()
            .map(|name| dir.path().join(name).display().to_string())
            .collect(),
        ..Default::default()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deep_merges_nested_maps() {
        let base = config(json!({ "k": { "a": 1, "b": 2 } }));
        let overrides = config(json!({ "k": { "b": 3, "c": 4 } }));

        assert_eq!(
            base.merge(&overrides),
            config(json!({ "k": { "a": 1, "b": 3, "c": 4 } }))
        );
    }

    #[rstest]
    #[case::arrays_replaced(json!({ "k": [1, 2] }), json!({ "k": [3] }), json!([3]))]
    #[case::scalar_over_map(json!({ "k": { "a": 1 } }), json!({ "k": 5 }), json!(5))]
    #[case::map_over_scalar(json!({ "k": 5 }), json!({ "k": { "a": 1 } }), json!({ "a": 1 }))]
    #[case::null_wins(json!({ "k": "x" }), json!({ "k": null }), Value::Null)]
    fn last_writer_wins(#[case] base: Value, #[case] overrides: Value, #[case] expected: Value) {
        let merged = config(base).merge(&config(overrides));
        assert_eq!(merged.get("k"), Some(&expected));
    }

    #[test]
    fn extends_chain_and_plugin_precedence() {
        let dir = workspace(&[
            ("grandparent.yaml", "shared: grandparent\nonly_grandparent: true\n"),
            ("parent.yaml", "extends: grandparent.yaml\nshared: parent\n"),
            ("plugin.yaml", "shared: plugin\nfrom_plugin: true\n"),
            (
                ".lintrap.yaml",
                "extends: parent.yaml\nlinter_plugins: [bundle]\nlocal: true\n",
            ),
        ]);

        struct Bundle(PathBuf);

        impl LinterPlugin for Bundle {
            fn name(&self) -> &str {
                "bundle"
            }

            fn register_linters(&self, registry: &mut LinterRegistry) -> Result<(), LintrapError> {
                registry.register(flag("Bundle::Flag"))
            }

            fn config_file_path(&self) -> Option<PathBuf> {
                Some(self.0.clone())
            }
        }

        let mut app = Application::builder()
            .name("Lintrap")
            .executable_name("lintrap")
            .version("0.0.0")
            .configuration_file_names([".lintrap.yaml"])
            .file_extensions(["txt"])
            .plugin(Bundle(dir.path().join("plugin.yaml")))
            .build()
            .unwrap();

        let resolved = app
            .load_configuration_from(&RunOptions::default(), dir.path())
            .unwrap();

        assert_eq!(resolved.get("shared"), Some(&json!("plugin")));
        assert_eq!(resolved.get("only_grandparent"), Some(&json!(true)));
        assert_eq!(resolved.get("from_plugin"), Some(&json!(true)));
        assert_eq!(resolved.get("local"), Some(&json!(true)));
        assert_eq!(resolved.get("extends"), None);
        assert_eq!(resolved.get("linter_plugins"), None);
        assert!(app.linters().contains("Bundle::Flag"));
    }

    #[test]
    fn extends_cycle_is_fatal() {
        let dir = workspace(&[
            ("a.yaml", "extends: b.yaml\n"),
            ("b.yaml", "extends: a.yaml\n"),
        ]);
        let mut app = application(Vec::new());
        let options = RunOptions {
            config_file: Some(dir.path().join("a.yaml")),
            ..Default::default()
        };

        let err = app.load_configuration_from(&options, dir.path()).unwrap_err();

        assert!(matches!(err, LintrapError::ExtendsCycle(_)));
        assert_eq!(err.exit_status(), 78);
    }
}

mod file_finder {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_is_sorted_deterministic_and_unique() {
        let dir = workspace(&[("b.txt", ""), ("a.txt", ""), ("sub/c.txt", ""), ("d.md", "")]);
        let root = dir.path().display().to_string();
        let options = FindOptions {
            included_paths: vec![root.clone(), dir.path().join("a.txt").display().to_string()],
            allowed_extensions: vec!["txt".to_string()],
            ..Default::default()
        };

        let first = FileFinder::new(options.clone()).find().unwrap();
        let second = FileFinder::new(options).find().unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                dir.path().join("a.txt"),
                dir.path().join("b.txt"),
                dir.path().join("sub/c.txt"),
            ]
        );
    }

    #[test]
    fn missing_included_path_is_path_error() {
        let dir = workspace(&[]);
        let options = FindOptions {
            included_paths: vec![dir.path().join("nope").display().to_string()],
            ..Default::default()
        };

        let result = FileFinder::new(options).find();
        assert!(matches!(result, Err(LintrapError::InvalidFilePath(_))));
    }

    #[test]
    fn unmatched_included_pattern_is_pattern_error() {
        let dir = workspace(&[("a.txt", "")]);
        let options = FindOptions {
            included_patterns: vec![format!("{}/*.rb", dir.path().display())],
            ..Default::default()
        };

        let result = FileFinder::new(options).find();
        assert!(matches!(result, Err(LintrapError::InvalidFilePattern(_))));
    }

    #[test]
    fn unmatched_excluded_pattern_is_fine() {
        let dir = workspace(&[("a.txt", "")]);
        let options = FindOptions {
            included_patterns: vec![format!("{}/*.txt", dir.path().display())],
            excluded_patterns: vec![format!("{}/*.rb", dir.path().display())],
            ..Default::default()
        };

        assert_eq!(
            FileFinder::new(options).find().unwrap(),
            vec![dir.path().join("a.txt")]
        );
    }
}

mod selection {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> LinterRegistry {
        let mut registry = LinterRegistry::new();
        registry.register(flag("Alpha")).unwrap();
        registry.register(flag("Beta")).unwrap();
        registry
    }

    fn enabled(
        config: Value,
        included: &[&str],
        excluded: &[&str],
    ) -> Result<Vec<String>, LintrapError> {
        let options = RunOptions {
            included_linters: included.iter().map(|s| s.to_string()).collect(),
            excluded_linters: excluded.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let registry = registry();
        let selector = LinterSelector::new(&registry, &super::config(config), &options)?;
        Ok(selector
            .enabled_linters()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    #[test]
    fn explicit_inclusion_bypasses_disabled_configuration() {
        let names = enabled(
            json!({ "linters": { "Alpha": { "enabled": false } } }),
            &["Alpha"],
            &[],
        )
        .unwrap();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[test]
    fn explicit_exclusion_wins_over_inclusion() {
        let names = enabled(json!({}), &["Alpha", "Beta"], &["Beta"]).unwrap();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[rstest]
    #[case::explicit_list_emptied(json!({}), &["Alpha"], &["Alpha"], "All specified linters were explicitly excluded!")]
    #[case::enabled_list_emptied(
        json!({ "linters": { "Alpha": { "enabled": true } } }),
        &[],
        &["Alpha"],
        "All enabled linters were explicitly excluded!"
    )]
    #[case::nothing_enabled(json!({}), &[], &[], "All linters are disabled. Enable some in your configuration!")]
    fn distinguishes_why_no_linters_run(
        #[case] config: Value,
        #[case] included: &[&str],
        #[case] excluded: &[&str],
        #[case] message: &str,
    ) {
        match enabled(config, included, excluded) {
            Err(LintrapError::NoLinters(actual)) => assert_eq!(actual, message),
            other => panic!("Expected NoLinters, got {:?}", other),
        }
    }
}

mod runs {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn linter_include_patterns_limit_files() {
        let dir = workspace(&[("a.txt", "text\n"), ("b.md", "markdown\n")]);
        let app = application(vec![flag("Constrained"), flag("Everywhere")]);
        let config = config(json!({
            "linters": {
                "Constrained": { "enabled": true, "include": ["**/*.txt"] },
                "Everywhere": { "enabled": true },
            }
        }));

        let report = run(&app, &config, &include(&dir, &["a.txt", "b.md"]));

        let seen: Vec<(String, String)> = report
            .lints()
            .iter()
            .map(|lint| (file_name(&lint.path), lint.linter.clone().unwrap()))
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

    #[rstest]
    #[case::default_severity(json!({}), Severity::Error)]
    #[case::overridden(json!({ "linter_exception_severity": "warning" }), Severity::Warning)]
    fn crashing_linter_yields_one_lint(#[case] overrides: Value, #[case] severity: Severity) {
        let dir = workspace(&[("x.txt", "one\ntwo\n")]);
        let app = application(vec![descriptor("Exploding", || Box::new(Exploding))]);
        let config = config(json!({ "linters": { "Exploding": { "enabled": true } } }))
            .merge(&super::config(overrides));

        let report = run(&app, &config, &include(&dir, &["x.txt"]));

        assert_eq!(report.lints().len(), 1);
        let lint = &report.lints()[0];
        assert_eq!(lint.source_range, SourceRange::at(1, 1));
        assert_eq!(file_name(&lint.path), "x.txt");
        assert_eq!(lint.severity, severity);
        assert!(lint.exception.is_some());
    }

    #[rstest]
    #[case::sequential(None)]
    #[case::parallel(Some(Concurrency::Auto))]
    fn lints_are_ordered_by_path_then_line(#[case] concurrency: Option<Concurrency>) {
        let dir = workspace(&[("b.txt", "1\n2\n3\n"), ("a.txt", "1\n2\n")]);
        let app = application(vec![descriptor("EveryLine", || Box::new(EveryLine))]);
        let config = config(json!({ "linters": { "EveryLine": { "enabled": true } } }));
        let options = RunOptions {
            concurrency,
            ..include(&dir, &["b.txt", "a.txt"])
        };

        let report = run(&app, &config, &options);

        let order: Vec<(String, u32)> = report
            .lints()
            .iter()
            .map(|lint| (file_name(&lint.path), lint.source_range.begin.line))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.txt".to_string(), 1),
                ("a.txt".to_string(), 2),
                ("b.txt".to_string(), 1),
                ("b.txt".to_string(), 2),
                ("b.txt".to_string(), 3),
            ]
        );
    }
}

mod reports {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lint(severity: Severity) -> Lint {
        Lint::new("a.txt", SourceRange::at(1, 1), "message", severity)
    }

    fn report(severities: &[Severity]) -> Report {
        Report::new(
            severities.iter().cloned().map(lint).collect(),
            vec![PathBuf::from("a.txt")],
            SeverityTable::from_pairs([("error", "fail"), ("warning", "warn"), ("info", "ignore")]),
        )
    }

    #[rstest]
    #[case::errors(&[Severity::Error], true, false)]
    #[case::warnings(&[Severity::Warning], false, true)]
    #[case::info(&[Severity::Info], false, false)]
    #[case::all(&[Severity::Info, Severity::Warning, Severity::Error], true, true)]
    fn classifies_by_severity_table(
        #[case] severities: &[Severity],
        #[case] failures: bool,
        #[case] warnings: bool,
    ) {
        let report = report(severities);
        assert_eq!(report.has_failures(), failures);
        assert_eq!(report.has_warnings(), warnings);
    }
}
