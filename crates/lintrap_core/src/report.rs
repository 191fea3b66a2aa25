//! Run results.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::Configuration;
use crate::lint::{Lint, sort_lints};
use crate::severity::Severity;

/// Action that makes a severity fail a run.
pub const FAIL_ACTION: &str = "fail";
/// Action that makes a severity count as a warning.
pub const WARN_ACTION: &str = "warn";

/// Maps severity names to the action they trigger (`fail`, `warn` or
/// anything else, which is ignored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityTable {
    actions: BTreeMap<String, String>,
}

impl SeverityTable {
    /// Reads the `severities` table, falling back to
    /// `{error: fail, warning: warn}` when it is absent or not a map.
    pub fn from_config(config: &Configuration) -> Self {
        match config.get("severities").and_then(Value::as_object) {
            Some(table) => Self {
                actions: table
                    .iter()
                    .filter_map(|(severity, action)| {
                        action
                            .as_str()
                            .map(|action| (severity.clone(), action.to_string()))
                    })
                    .collect(),
            },
            None => Self::default(),
        }
    }

    /// Builds a table from `(severity, action)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            actions: pairs
                .into_iter()
                .map(|(severity, action)| (severity.to_string(), action.to_string()))
                .collect(),
        }
    }

    pub fn action(&self, severity: &Severity) -> Option<&str> {
        self.actions.get(severity.as_str()).map(String::as_str)
    }

    pub fn is_failure(&self, severity: &Severity) -> bool {
        self.action(severity) == Some(FAIL_ACTION)
    }

    pub fn is_warning(&self, severity: &Severity) -> bool {
        self.action(severity) == Some(WARN_ACTION)
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self::from_pairs([("error", FAIL_ACTION), ("warning", WARN_ACTION)])
    }
}

/// Lints and inspected documents of a finished run.
#[derive(Debug, Clone)]
pub struct Report {
    lints: Vec<Lint>,
    documents: Vec<PathBuf>,
    severities: SeverityTable,
}

impl Report {
    /// Creates a report; `lints` are put into canonical order.
    pub fn new(mut lints: Vec<Lint>, documents: Vec<PathBuf>, severities: SeverityTable) -> Self {
        sort_lints(&mut lints);
        Self {
            lints,
            documents,
            severities,
        }
    }

    /// All lints sorted by path, then line.
    pub fn lints(&self) -> &[Lint] {
        &self.lints
    }

    /// Paths of the documents that were linted.
    pub fn documents_inspected(&self) -> &[PathBuf] {
        &self.documents
    }

    pub fn severities(&self) -> &SeverityTable {
        &self.severities
    }

    pub fn failures(&self) -> impl Iterator<Item = &Lint> {
        self.lints
            .iter()
            .filter(|lint| self.severities.is_failure(&lint.severity))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Lint> {
        self.lints
            .iter()
            .filter(|lint| self.severities.is_warning(&lint.severity))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Whether the run produced no lints at all.
    pub fn is_success(&self) -> bool {
        self.lints.is_empty()
    }

    /// Lints grouped by path, in report order.
    pub fn lints_by_path(&self) -> Vec<(&Path, Vec<&Lint>)> {
        let mut grouped: Vec<(&Path, Vec<&Lint>)> = Vec::new();
        for lint in &self.lints {
            match grouped.last_mut() {
                Some((path, lints)) if *path == lint.path() => lints.push(lint),
                _ => grouped.push((lint.path(), vec![lint])),
            }
        }
        grouped
    }
}
