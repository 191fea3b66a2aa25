//! JSON output.

use serde_json::{Value, json};
use tracing::warn;

use super::{Formatter, FormatterContext, OutputStream};
use crate::lint::Lint;
use crate::report::Report;

/// Writes the whole report as one JSON document when the run finishes.
pub struct JsonFormatter {
    context: FormatterContext,
    output: OutputStream,
}

impl JsonFormatter {
    pub fn new(context: FormatterContext, output: OutputStream) -> Self {
        Self { context, output }
    }

    fn to_value(&self, report: &Report) -> Value {
        let groups = report.lints_by_path();

        let files: Vec<Value> = groups
            .iter()
            .map(|(path, lints)| {
                json!({
                    "path": path.display().to_string(),
                    "offenses": lints.iter().map(|lint| offense(lint)).collect::<Vec<_>>(),
                })
            })
            .collect();

        json!({
            "metadata": {
                "linter_name": self.context.application_name,
                "linter_version": self.context.version,
            },
            "files": files,
            "summary": {
                "offense_count": report.lints().len(),
                "offending_file_count": groups.len(),
                "inspected_file_count": report.documents_inspected().len(),
            },
        })
    }
}

impl Formatter for JsonFormatter {
    fn finished(&self, report: &Report) {
        match serde_json::to_string_pretty(&self.to_value(report)) {
            Ok(text) => self.output.write(&format!("{}\n", text)),
            Err(e) => warn!("Failed to serialize report: {}", e),
        }
    }
}

fn offense(lint: &Lint) -> Value {
    let range = lint.source_range;
    json!({
        "severity": lint.severity.as_str(),
        "message": lint.message,
        "line": range.begin.line,
        "column": range.begin.column,
        "source_range": {
            "begin": { "line": range.begin.line, "column": range.begin.column },
            "end": { "line": range.end.line, "column": range.end.column },
        },
    })
}
